//! Run summary statistics
//!
//! Structured counterpart of the processing summary the downstream
//! narrative renderer prints: line/claim counts, charge totals, service
//! mix, and the covered date range.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{Money, RunId, ServiceSpan};

use crate::classifier::ServiceCategory;
use crate::error::RowValidationError;
use crate::planner::SplitPlan;

/// Totals for one split plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTotals {
    pub output_claims: usize,
    pub total_lines: usize,
    pub total_charges: Money,
    pub service_span: Option<ServiceSpan>,
    pub service_mix: BTreeMap<ServiceCategory, usize>,
}

impl PlanTotals {
    pub fn for_plan(plan: &SplitPlan) -> Self {
        let mut service_mix: BTreeMap<ServiceCategory, usize> = BTreeMap::new();
        for claim in &plan.claims {
            for line in &claim.lines {
                *service_mix.entry(line.item.category).or_insert(0) += 1;
            }
        }
        let service_span = ServiceSpan::covering(
            plan.claims
                .iter()
                .flat_map(|c| c.lines.iter().map(|l| l.item.service_date())),
        );
        Self {
            output_claims: plan.claims.len(),
            total_lines: plan.line_count(),
            total_charges: plan.total_charges(),
            service_span,
            service_mix,
        }
    }
}

/// Whole-run statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    /// Rows received, including rejected ones
    pub total_rows: usize,
    pub rejected_rows: usize,
    /// Distinct source claims processed
    pub source_claims: usize,
    /// Output claims produced across all plans
    pub output_claims: usize,
    /// Source claims that required splitting
    pub claims_split: usize,
    pub total_charges: Money,
    pub service_mix: BTreeMap<ServiceCategory, usize>,
    pub service_span: Option<ServiceSpan>,
}

impl RunSummary {
    pub fn build(
        run_id: RunId,
        total_rows: usize,
        rejected: &[RowValidationError],
        plans: &[SplitPlan],
    ) -> Self {
        let mut service_mix: BTreeMap<ServiceCategory, usize> = BTreeMap::new();
        let mut total_charges = Money::zero();
        let mut output_claims = 0;
        let mut claims_split = 0;
        for plan in plans {
            let totals = PlanTotals::for_plan(plan);
            output_claims += totals.output_claims;
            total_charges += totals.total_charges;
            if plan.was_split() {
                claims_split += 1;
            }
            for (category, count) in totals.service_mix {
                *service_mix.entry(category).or_insert(0) += count;
            }
        }
        let service_span = ServiceSpan::covering(plans.iter().flat_map(|p| {
            p.claims
                .iter()
                .flat_map(|c| c.lines.iter().map(|l| l.item.service_date()))
        }));
        Self {
            run_id,
            total_rows,
            rejected_rows: rejected.len(),
            source_claims: plans.len(),
            output_claims,
            claims_split,
            total_charges,
            service_mix,
            service_span,
        }
    }
}
