//! Line item intake
//!
//! The ingestion layer hands the engine loosely-typed rows; intake parses
//! them eagerly into strongly-typed [`LineItem`]s at the boundary. Malformed
//! rows are rejected per-row with a structured error and reported separately
//! from the plan - they never propagate into the pipeline.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimNumber, Money, PatientId};

use crate::error::{RowErrorReason, RowValidationError};

/// A raw input row as handed over by the ingestion layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemDraft {
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub claim_id: Option<String>,
    #[serde(default)]
    pub revenue_code: Option<String>,
    #[serde(default)]
    pub hcpcs_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub service_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub units: Option<i64>,
    #[serde(default)]
    pub charge_amount: Option<Decimal>,
    /// Informational only; `charge_amount` summed across rows is the
    /// source of truth
    #[serde(default)]
    pub total_charges: Option<Decimal>,
}

/// A validated input row
///
/// Immutable once read; the ordinal is the original row position and is the
/// identity used for all integrity checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Original row position in the input table
    pub ordinal: usize,
    pub patient_id: PatientId,
    pub claim_number: ClaimNumber,
    pub revenue_code: Option<String>,
    pub hcpcs_code: Option<String>,
    pub description: String,
    pub service_date: DateTime<Utc>,
    pub units: u32,
    pub charge_amount: Money,
    /// The stated claim total from the input, carried for traceability
    pub stated_total: Option<Money>,
}

impl LineItem {
    /// Validates a draft row at position `ordinal`
    pub fn from_draft(ordinal: usize, draft: LineItemDraft) -> Result<Self, RowValidationError> {
        let reject = |reason| RowValidationError { ordinal, reason };

        let patient_id = match normalize(draft.patient_id) {
            Some(value) => PatientId::new(value),
            None => return Err(reject(RowErrorReason::MissingPatientId)),
        };
        let claim_number = match normalize(draft.claim_id) {
            Some(value) => ClaimNumber::new(value),
            None => return Err(reject(RowErrorReason::MissingClaimId)),
        };
        let service_date = draft
            .service_date
            .ok_or_else(|| reject(RowErrorReason::MissingServiceDate))?;
        let charge = draft
            .charge_amount
            .ok_or_else(|| reject(RowErrorReason::MissingChargeAmount))?;
        if charge.is_sign_negative() && !charge.is_zero() {
            return Err(reject(RowErrorReason::NegativeChargeAmount(charge)));
        }
        let units = match draft.units {
            Some(n) if n < 0 => return Err(reject(RowErrorReason::NegativeUnits(n))),
            Some(n) => n as u32,
            // billing convention: an omitted unit count means one unit
            None => 1,
        };

        Ok(Self {
            ordinal,
            patient_id,
            claim_number,
            revenue_code: normalize(draft.revenue_code),
            hcpcs_code: normalize(draft.hcpcs_code),
            description: normalize(draft.description).unwrap_or_default(),
            service_date,
            units,
            charge_amount: Money::new(charge),
            stated_total: draft.total_charges.map(Money::new),
        })
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Result of validating a batch of raw rows
#[derive(Debug, Clone, Default)]
pub struct Intake {
    pub items: Vec<LineItem>,
    pub rejected: Vec<RowValidationError>,
}

/// Validates raw rows in input order, assigning ordinals by position
pub fn intake(drafts: Vec<LineItemDraft>) -> Intake {
    let mut result = Intake::default();
    for (ordinal, draft) in drafts.into_iter().enumerate() {
        match LineItem::from_draft(ordinal, draft) {
            Ok(item) => result.items.push(item),
            Err(error) => result.rejected.push(error),
        }
    }
    result
}
