//! Pipeline orchestration
//!
//! Runs intake -> classification -> grouping -> ordering -> planning ->
//! validation for every source claim in the input and assembles the run
//! result. Each source claim is processed independently; no state is shared
//! across claims or across runs.

use std::collections::BTreeMap;

use core_kernel::{ClaimNumber, SourceClaimKey};

use crate::audit::{AuditTrail, RuleApplied};
use crate::classifier::CodeClassifier;
use crate::config::{GroupingScope, SplitConfig};
use crate::error::{RowValidationError, SplitError};
use crate::grouping::TemporalGrouper;
use crate::line_item::{intake, LineItem, LineItemDraft};
use crate::ordering::PriorityOrderer;
use crate::planner::{SplitPlan, SplitPlanner};
use crate::summary::RunSummary;
use crate::validator::{IntegrityValidator, ValidationReport};

/// Everything one run produces
///
/// Rendering plans into sheets, narrating decisions, and delivering files
/// are all the caller's responsibility.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// One plan per source claim, in deterministic key order
    pub plans: Vec<SplitPlan>,
    /// One validation report per plan, same order
    pub validations: Vec<ValidationReport>,
    pub audit: AuditTrail,
    /// Rows excluded at intake
    pub rejected_rows: Vec<RowValidationError>,
    pub summary: RunSummary,
}

impl ProcessingResult {
    /// True when every plan passed validation
    pub fn all_valid(&self) -> bool {
        self.validations.iter().all(|v| v.passed)
    }
}

/// End-to-end claim splitting pipeline
#[derive(Debug, Clone)]
pub struct ClaimProcessor {
    config: SplitConfig,
}

impl ClaimProcessor {
    /// Creates a processor, failing fast on invalid configuration
    pub fn new(config: SplitConfig) -> Result<Self, SplitError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Processes one input table
    pub fn process(&self, drafts: Vec<LineItemDraft>) -> ProcessingResult {
        let total_rows = drafts.len();
        let intake_result = intake(drafts);
        for rejection in &intake_result.rejected {
            tracing::warn!(ordinal = rejection.ordinal, reason = %rejection.reason, "row excluded");
        }

        let mut audit = AuditTrail::new();
        let classifier = CodeClassifier::new(&self.config);
        let grouper = TemporalGrouper::new(&self.config);
        let orderer = PriorityOrderer::new();
        let planner = SplitPlanner::new(self.config.max_lines_per_claim);
        let validator = IntegrityValidator::new(self.config.max_lines_per_claim);

        let mut plans = Vec::new();
        let mut validations = Vec::new();
        for (key, items) in self.scoped(intake_result.items) {
            tracing::info!(claim = %key, lines = items.len(), "processing source claim");

            let classified = items.iter().cloned().map(|i| classifier.classify(i)).collect();
            let groups = grouper.group(&key, classified, &mut audit);
            let ordered = orderer.order(&key, groups, &mut audit);
            let plan = planner.plan(&key, ordered, &mut audit);
            let report = validator.validate(&items, &plan, &audit);

            let verdict = if report.passed {
                RuleApplied::ValidationPassed
            } else {
                tracing::warn!(
                    claim = %key,
                    violations = report.violations.len(),
                    "plan failed integrity validation"
                );
                RuleApplied::ValidationFailed {
                    violations: report.violations.len(),
                }
            };
            audit.record(&key, verdict, plan.ordinals());

            plans.push(plan);
            validations.push(report);
        }

        let summary = RunSummary::build(
            audit.run_id(),
            total_rows,
            &intake_result.rejected,
            &plans,
        );
        ProcessingResult {
            plans,
            validations,
            audit,
            rejected_rows: intake_result.rejected,
            summary,
        }
    }

    /// Partitions valid items into independent processing scopes
    ///
    /// BTreeMap keys give a deterministic claim processing order. Under
    /// `PerPatient` the scope key takes the claim number of the patient's
    /// first row.
    fn scoped(&self, items: Vec<LineItem>) -> BTreeMap<SourceClaimKey, Vec<LineItem>> {
        let mut scoped: BTreeMap<SourceClaimKey, Vec<LineItem>> = BTreeMap::new();
        match self.config.scope {
            GroupingScope::PerClaim => {
                for item in items {
                    let key =
                        SourceClaimKey::new(item.patient_id.clone(), item.claim_number.clone());
                    scoped.entry(key).or_default().push(item);
                }
            }
            GroupingScope::PerPatient => {
                let mut first_claim: BTreeMap<_, ClaimNumber> = BTreeMap::new();
                for item in items {
                    let claim = first_claim
                        .entry(item.patient_id.clone())
                        .or_insert_with(|| item.claim_number.clone())
                        .clone();
                    let key = SourceClaimKey::new(item.patient_id.clone(), claim);
                    scoped.entry(key).or_default().push(item);
                }
            }
        }
        scoped
    }
}
