//! Temporal proximity types
//!
//! Visit grouping is driven by service-date proximity: two ER visits merge
//! when they fall inside the consolidation window, and ancillary services
//! attach to an ER anchor when they fall inside the association window.
//! `HourWindow` models those windows; `ServiceSpan` accumulates the date
//! range covered by a set of lines for reporting.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid window: {hours} hours (must be non-negative)")]
    InvalidWindow { hours: i64 },
}

/// A symmetric proximity window measured in hours
///
/// A timestamp is inside the window of an anchor when the absolute distance
/// between the two is at most the window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourWindow(i64);

impl HourWindow {
    /// Creates a window of the given size
    pub fn new(hours: i64) -> Result<Self, TemporalError> {
        if hours < 0 {
            return Err(TemporalError::InvalidWindow { hours });
        }
        Ok(Self(hours))
    }

    /// Returns the window size in hours
    pub fn hours(&self) -> i64 {
        self.0
    }

    /// Returns the window as a chrono Duration
    pub fn duration(&self) -> Duration {
        Duration::hours(self.0)
    }

    /// Returns true if `timestamp` falls within this window of `anchor`
    pub fn contains(&self, anchor: DateTime<Utc>, timestamp: DateTime<Utc>) -> bool {
        self.distance(anchor, timestamp) <= self.duration()
    }

    /// Absolute distance between two timestamps
    pub fn distance(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> Duration {
        if a >= b {
            a - b
        } else {
            b - a
        }
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        Self(24)
    }
}

/// The earliest/latest service timestamps covered by a set of lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpan {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

impl ServiceSpan {
    /// Creates a span covering a single timestamp
    pub fn single(timestamp: DateTime<Utc>) -> Self {
        Self {
            earliest: timestamp,
            latest: timestamp,
        }
    }

    /// Widens the span to include another timestamp
    pub fn extend(&mut self, timestamp: DateTime<Utc>) {
        if timestamp < self.earliest {
            self.earliest = timestamp;
        }
        if timestamp > self.latest {
            self.latest = timestamp;
        }
    }

    /// Builds a span covering all given timestamps, None when empty
    pub fn covering<I>(timestamps: I) -> Option<Self>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut iter = timestamps.into_iter();
        let mut span = Self::single(iter.next()?);
        for t in iter {
            span.extend(t);
        }
        Some(span)
    }

    /// Duration between the earliest and latest timestamps
    pub fn duration(&self) -> Duration {
        self.latest - self.earliest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, min, 0).unwrap()
    }

    #[test]
    fn test_window_rejects_negative() {
        assert_eq!(
            HourWindow::new(-1),
            Err(TemporalError::InvalidWindow { hours: -1 })
        );
    }

    #[test]
    fn test_window_contains_is_symmetric() {
        let w = HourWindow::new(24).unwrap();
        assert!(w.contains(ts(12, 0), ts(9, 0)));
        assert!(w.contains(ts(9, 0), ts(12, 0)));
    }

    #[test]
    fn test_window_boundary_inclusive() {
        let w = HourWindow::new(3).unwrap();
        assert!(w.contains(ts(6, 0), ts(9, 0)));
        assert!(!w.contains(ts(6, 0), ts(9, 1)));
    }

    #[test]
    fn test_zero_window_only_matches_equal() {
        let w = HourWindow::new(0).unwrap();
        assert!(w.contains(ts(6, 0), ts(6, 0)));
        assert!(!w.contains(ts(6, 0), ts(6, 1)));
    }

    #[test]
    fn test_span_covering() {
        let span = ServiceSpan::covering([ts(8, 0), ts(6, 0), ts(12, 0)]).unwrap();
        assert_eq!(span.earliest, ts(6, 0));
        assert_eq!(span.latest, ts(12, 0));
        assert_eq!(span.duration(), Duration::hours(6));
    }

    #[test]
    fn test_span_covering_empty() {
        assert!(ServiceSpan::covering(std::iter::empty()).is_none());
    }
}
