//! Test data builders
//!
//! Builder patterns for constructing test rows with sensible defaults, so
//! tests only specify the fields they care about.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use domain_splitting::LineItemDraft;

use crate::fixtures::{CodeFixtures, IdFixtures, MoneyFixtures, TemporalFixtures};

/// Builder for input rows
#[derive(Debug, Clone)]
pub struct LineItemBuilder {
    patient_id: Option<String>,
    claim_id: Option<String>,
    revenue_code: Option<String>,
    hcpcs_code: Option<String>,
    description: Option<String>,
    service_date: Option<DateTime<Utc>>,
    units: Option<i64>,
    charge_amount: Option<Decimal>,
    total_charges: Option<Decimal>,
}

impl Default for LineItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineItemBuilder {
    /// A valid medical/surgical supply row
    pub fn new() -> Self {
        Self {
            patient_id: Some(IdFixtures::patient_id()),
            claim_id: Some(IdFixtures::claim_id()),
            revenue_code: Some(CodeFixtures::supply_revenue().to_string()),
            hcpcs_code: None,
            description: Some("MED/SURG SUPPLY".to_string()),
            service_date: Some(TemporalFixtures::base_time()),
            units: Some(1),
            charge_amount: Some(MoneyFixtures::supply_charge()),
            total_charges: None,
        }
    }

    /// An ER visit row at the fixture base time
    pub fn er_visit() -> Self {
        Self::new()
            .with_revenue_code(CodeFixtures::er_revenue())
            .with_description("ER VISIT LEVEL 4")
            .with_charge(MoneyFixtures::er_visit_charge())
    }

    /// An imaging row, by HCPCS code
    pub fn imaging() -> Self {
        let mut builder = Self::new()
            .with_description("CT HEAD W/O CONTRAST")
            .with_charge(MoneyFixtures::imaging_charge());
        builder.revenue_code = None;
        builder.hcpcs_code = Some(CodeFixtures::imaging_hcpcs().to_string());
        builder
    }

    /// A laboratory row, by HCPCS code
    pub fn lab() -> Self {
        let mut builder = Self::new()
            .with_description("COMPREHENSIVE METABOLIC PANEL")
            .with_charge(MoneyFixtures::lab_charge());
        builder.revenue_code = None;
        builder.hcpcs_code = Some(CodeFixtures::lab_hcpcs().to_string());
        builder
    }

    pub fn with_patient_id(mut self, id: impl Into<String>) -> Self {
        self.patient_id = Some(id.into());
        self
    }

    pub fn with_claim_id(mut self, id: impl Into<String>) -> Self {
        self.claim_id = Some(id.into());
        self
    }

    pub fn with_revenue_code(mut self, code: impl Into<String>) -> Self {
        self.revenue_code = Some(code.into());
        self
    }

    pub fn with_hcpcs_code(mut self, code: impl Into<String>) -> Self {
        self.hcpcs_code = Some(code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_service_date(mut self, date: DateTime<Utc>) -> Self {
        self.service_date = Some(date);
        self
    }

    /// Service date offset from the fixture base time
    pub fn hours_after_base(self, hours: i64) -> Self {
        self.with_service_date(TemporalFixtures::hours_after(hours))
    }

    pub fn with_units(mut self, units: i64) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_charge(mut self, amount: Decimal) -> Self {
        self.charge_amount = Some(amount);
        self
    }

    /// Clears a required field, producing a row intake must reject
    pub fn missing_claim_id(mut self) -> Self {
        self.claim_id = None;
        self
    }

    pub fn missing_service_date(mut self) -> Self {
        self.service_date = None;
        self
    }

    pub fn missing_charge(mut self) -> Self {
        self.charge_amount = None;
        self
    }

    pub fn build(self) -> LineItemDraft {
        LineItemDraft {
            patient_id: self.patient_id,
            claim_id: self.claim_id,
            revenue_code: self.revenue_code,
            hcpcs_code: self.hcpcs_code,
            description: self.description,
            service_date: self.service_date,
            units: self.units,
            charge_amount: self.charge_amount,
            total_charges: self.total_charges,
        }
    }
}

/// Builds a table of identical supply rows for one claim
pub fn uniform_table(claim_id: &str, rows: usize) -> Vec<LineItemDraft> {
    (0..rows)
        .map(|_| LineItemBuilder::new().with_claim_id(claim_id).build())
        .collect()
}
