//! Property-based test generators
//!
//! Proptest strategies that produce random input tables while maintaining
//! the row invariants intake expects of valid data.

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_splitting::LineItemDraft;

use crate::fixtures::TemporalFixtures;

/// Charge amounts in cents, non-negative
pub fn charge_cents_strategy() -> impl Strategy<Value = i64> {
    0i64..5_000_000i64
}

/// Service times within a two-week span of the fixture base time
pub fn service_offset_strategy() -> impl Strategy<Value = i64> {
    0i64..(14 * 24)
}

/// One of the standard revenue codes, weighted toward ordinary services
pub fn revenue_code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => Just("0270".to_string()),
        2 => Just("0450".to_string()),
        2 => Just("0350".to_string()),
        2 => Just("0300".to_string()),
        1 => Just("0206".to_string()),
        1 => Just("0360".to_string()),
    ]
}

/// A valid draft row for the given claim
pub fn draft_strategy(claim_id: &'static str) -> impl Strategy<Value = LineItemDraft> {
    (
        revenue_code_strategy(),
        service_offset_strategy(),
        charge_cents_strategy(),
        1i64..10i64,
    )
        .prop_map(move |(revenue, offset_hours, cents, units)| LineItemDraft {
            patient_id: Some("P001".to_string()),
            claim_id: Some(claim_id.to_string()),
            revenue_code: Some(revenue),
            hcpcs_code: None,
            description: Some("GENERATED SERVICE".to_string()),
            service_date: Some(TemporalFixtures::base_time() + Duration::hours(offset_hours)),
            units: Some(units),
            charge_amount: Some(Decimal::new(cents, 2)),
            total_charges: None,
        })
}

/// A whole input table for one claim
pub fn table_strategy(claim_id: &'static str, max_rows: usize) -> impl Strategy<Value = Vec<LineItemDraft>> {
    prop::collection::vec(draft_strategy(claim_id), 0..max_rows)
}
