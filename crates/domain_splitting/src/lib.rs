//! Claim Splitting Domain
//!
//! This crate re-partitions a flat table of medical-claim line items into
//! output claims that respect a line-count limit while keeping clinically
//! related services together and preserving every charge exactly.
//!
//! # Pipeline
//!
//! ```text
//! intake -> classify -> group visits -> order -> plan split -> validate
//! ```
//!
//! Row intake rejects malformed rows individually; classification maps
//! codes to service categories; temporal grouping clusters ER visits with
//! their associated services; ordering applies the clinical priority
//! ladder; planning cuts at visit-group boundaries; validation checks that
//! nothing was lost, duplicated, or altered. Every rule application is
//! captured in a structured audit trail.

pub mod audit;
pub mod classifier;
pub mod config;
pub mod error;
pub mod grouping;
pub mod line_item;
pub mod ordering;
pub mod planner;
pub mod processor;
pub mod summary;
pub mod validator;

pub use audit::{AuditTrail, DecisionRecord, RuleApplied};
pub use classifier::{ClassifiedItem, CodeClassifier, ServiceCategory};
pub use config::{CodeTable, GroupingScope, PriorityTable, SplitConfig, DEFAULT_MAX_LINES};
pub use error::{RowErrorReason, RowValidationError, SplitError};
pub use grouping::{TemporalGrouper, VisitGroup};
pub use line_item::{intake, Intake, LineItem, LineItemDraft};
pub use ordering::PriorityOrderer;
pub use planner::{ClaimLine, GroupDigest, OutputClaim, SplitPlan, SplitPlanner};
pub use processor::{ClaimProcessor, ProcessingResult};
pub use summary::{PlanTotals, RunSummary};
pub use validator::{IntegrityValidator, ValidationReport, Violation};
