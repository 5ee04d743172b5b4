//! Splitting domain errors
//!
//! Row-level problems are recoverable data (the row is excluded and the run
//! continues); configuration problems abort the run before any grouping
//! begins. Post-split integrity problems are never errors at all - they are
//! reported as [`Violation`](crate::validator::Violation) values.

use core_kernel::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in the splitting domain
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SplitError {
    pub fn configuration(message: impl Into<String>) -> Self {
        SplitError::Configuration(message.into())
    }
}

/// A structurally invalid input row, excluded from processing
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Row {ordinal} rejected: {reason}")]
pub struct RowValidationError {
    /// Original row position in the input table
    pub ordinal: usize,
    pub reason: RowErrorReason,
}

/// Why an input row was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RowErrorReason {
    #[error("missing patient id")]
    MissingPatientId,

    #[error("missing claim id")]
    MissingClaimId,

    #[error("missing service date")]
    MissingServiceDate,

    #[error("missing charge amount")]
    MissingChargeAmount,

    #[error("negative charge amount: {0}")]
    NegativeChargeAmount(Decimal),

    #[error("negative units: {0}")]
    NegativeUnits(i64),
}
