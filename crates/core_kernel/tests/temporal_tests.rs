//! Integration tests for the Temporal module
//!
//! Covers HourWindow containment and ServiceSpan accumulation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{HourWindow, ServiceSpan, TemporalError};

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

mod hour_window {
    use super::*;

    #[test]
    fn test_new_accepts_zero_and_positive() {
        assert!(HourWindow::new(0).is_ok());
        assert_eq!(HourWindow::new(24).unwrap().hours(), 24);
    }

    #[test]
    fn test_new_rejects_negative() {
        assert_eq!(
            HourWindow::new(-6),
            Err(TemporalError::InvalidWindow { hours: -6 })
        );
    }

    #[test]
    fn test_default_is_twenty_four_hours() {
        assert_eq!(HourWindow::default().hours(), 24);
    }

    #[test]
    fn test_contains_either_direction() {
        let w = HourWindow::new(24).unwrap();
        assert!(w.contains(ts(10, 6), ts(10, 20)));
        assert!(w.contains(ts(10, 20), ts(10, 6)));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let w = HourWindow::new(24).unwrap();
        assert!(w.contains(ts(10, 6), ts(11, 6)));
        assert!(!w.contains(ts(10, 6), ts(11, 7)));
    }

    #[test]
    fn test_distance() {
        let w = HourWindow::default();
        assert_eq!(w.distance(ts(10, 6), ts(10, 14)), Duration::hours(8));
        assert_eq!(w.distance(ts(10, 14), ts(10, 6)), Duration::hours(8));
    }

    #[test]
    fn test_duration_conversion() {
        assert_eq!(HourWindow::new(48).unwrap().duration(), Duration::hours(48));
    }
}

mod service_span {
    use super::*;

    #[test]
    fn test_single_covers_one_instant() {
        let span = ServiceSpan::single(ts(10, 6));
        assert_eq!(span.earliest, span.latest);
        assert_eq!(span.duration(), Duration::zero());
    }

    #[test]
    fn test_extend_widens_both_ends() {
        let mut span = ServiceSpan::single(ts(10, 12));
        span.extend(ts(10, 6));
        span.extend(ts(12, 18));
        assert_eq!(span.earliest, ts(10, 6));
        assert_eq!(span.latest, ts(12, 18));
    }

    #[test]
    fn test_extend_ignores_interior_timestamps() {
        let mut span = ServiceSpan::single(ts(10, 6));
        span.extend(ts(12, 18));
        span.extend(ts(11, 0));
        assert_eq!(span.earliest, ts(10, 6));
        assert_eq!(span.latest, ts(12, 18));
    }

    #[test]
    fn test_covering_unordered_input() {
        let span = ServiceSpan::covering([ts(11, 3), ts(10, 6), ts(12, 9)]).unwrap();
        assert_eq!(span.earliest, ts(10, 6));
        assert_eq!(span.latest, ts(12, 9));
        assert_eq!(span.duration(), Duration::hours(51));
    }

    #[test]
    fn test_covering_empty_is_none() {
        assert!(ServiceSpan::covering(std::iter::empty()).is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let span = ServiceSpan::covering([ts(10, 6), ts(12, 9)]).unwrap();
        let json = serde_json::to_string(&span).unwrap();
        let restored: ServiceSpan = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, span);
    }
}
