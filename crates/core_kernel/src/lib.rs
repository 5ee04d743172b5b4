//! Core Kernel - Foundational types for the claim splitting engine
//!
//! This crate provides the building blocks the splitting domain is written
//! in terms of:
//! - Money with precise decimal arithmetic for charge amounts
//! - Temporal proximity windows for visit grouping
//! - Strongly-typed patient/claim/run identifiers

pub mod error;
pub mod identifiers;
pub mod money;
pub mod temporal;

pub use error::CoreError;
pub use identifiers::{ClaimNumber, DecisionId, PatientId, RunId, SourceClaimKey};
pub use money::{Money, MoneyError};
pub use temporal::{HourWindow, ServiceSpan, TemporalError};
