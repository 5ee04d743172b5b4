//! Pre-built test data for common entities

use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::Money;

/// Base timestamp every temporal fixture is offset from
static BASE_SERVICE_TIME: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap());

/// Temporal fixtures
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The fixture epoch: an ER admission at 06:00 UTC
    pub fn base_time() -> DateTime<Utc> {
        *BASE_SERVICE_TIME
    }

    /// Base time shifted by whole hours
    pub fn hours_after(hours: i64) -> DateTime<Utc> {
        Self::base_time() + Duration::hours(hours)
    }

    /// Base time shifted by whole days
    pub fn days_after(days: i64) -> DateTime<Utc> {
        Self::base_time() + Duration::days(days)
    }
}

/// Money fixtures
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn er_visit_charge() -> Decimal {
        dec!(1850.00)
    }

    pub fn imaging_charge() -> Decimal {
        dec!(640.50)
    }

    pub fn lab_charge() -> Decimal {
        dec!(78.25)
    }

    pub fn supply_charge() -> Decimal {
        dec!(12.99)
    }

    pub fn money(amount: Decimal) -> Money {
        Money::new(amount)
    }
}

/// Medical code fixtures matching the standard code table
pub struct CodeFixtures;

impl CodeFixtures {
    pub fn er_revenue() -> &'static str {
        "0450"
    }

    pub fn er_hcpcs() -> &'static str {
        "99284"
    }

    pub fn imaging_revenue() -> &'static str {
        "0350"
    }

    pub fn imaging_hcpcs() -> &'static str {
        "70450"
    }

    pub fn lab_hcpcs() -> &'static str {
        "80053"
    }

    pub fn icu_revenue() -> &'static str {
        "0206"
    }

    pub fn surgery_revenue() -> &'static str {
        "0360"
    }

    pub fn supply_revenue() -> &'static str {
        "0270"
    }

    pub fn drug_hcpcs() -> &'static str {
        "J1885"
    }
}

/// Identifier fixtures
pub struct IdFixtures;

impl IdFixtures {
    pub fn patient_id() -> String {
        "P001".to_string()
    }

    pub fn claim_id() -> String {
        "C100".to_string()
    }

    /// A random-but-plausible patient identifier
    pub fn random_patient_id() -> String {
        NumberWithFormat("P####").fake()
    }

    /// A random-but-plausible claim identifier
    pub fn random_claim_id() -> String {
        NumberWithFormat("CLM-######").fake()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_after() {
        assert_eq!(
            TemporalFixtures::hours_after(3) - TemporalFixtures::base_time(),
            Duration::hours(3)
        );
    }

    #[test]
    fn test_random_patient_id_format() {
        let id = IdFixtures::random_patient_id();
        assert!(id.starts_with('P'));
        assert_eq!(id.len(), 5);
    }
}
