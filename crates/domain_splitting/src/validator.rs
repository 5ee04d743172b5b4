//! Post-split integrity validation
//!
//! A pure checker over a proposed plan. Nothing here throws: every broken
//! invariant becomes a [`Violation`] in the report and the orchestrator
//! decides whether to reject the plan or surface it with the failures
//! attached.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use core_kernel::{Money, SourceClaimKey};

use crate::audit::AuditTrail;
use crate::line_item::LineItem;
use crate::planner::SplitPlan;

/// A broken post-split invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// An input line is missing from the plan
    MissingLine { ordinal: usize },
    /// An input line appears more than once
    DuplicateLine { ordinal: usize, occurrences: usize },
    /// Plan charge total differs from the input total
    ChargeTotalMismatch { expected: Money, actual: Money },
    /// An output claim exceeds the line limit with no forced-split record
    LineLimitExceeded {
        claim_reference: String,
        lines: usize,
        limit: usize,
    },
    /// A group's members span claims with no forced-split record
    GroupSplitAcrossClaims { group: usize, claim_count: usize },
}

/// Outcome of validating one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub source: SourceClaimKey,
    pub passed: bool,
    pub violations: Vec<Violation>,
}

/// Checks that a plan preserves its input exactly
#[derive(Debug, Clone, Copy)]
pub struct IntegrityValidator {
    max_lines: usize,
    /// Permitted charge-total deviation; exact by default
    tolerance: Money,
}

impl IntegrityValidator {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines,
            tolerance: Money::zero(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: Money) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Runs all checks; each is reported independently
    pub fn validate(
        &self,
        original: &[LineItem],
        plan: &SplitPlan,
        audit: &AuditTrail,
    ) -> ValidationReport {
        let mut violations = Vec::new();
        let forced_groups = audit.forced_split_groups(&plan.source);

        self.check_conservation(original, plan, &mut violations);
        self.check_charges(original, plan, &mut violations);
        self.check_line_limits(plan, &forced_groups, &mut violations);
        self.check_group_membership(plan, &forced_groups, &mut violations);

        ValidationReport {
            source: plan.source.clone(),
            passed: violations.is_empty(),
            violations,
        }
    }

    /// Every original ordinal appears exactly once across the plan
    fn check_conservation(
        &self,
        original: &[LineItem],
        plan: &SplitPlan,
        violations: &mut Vec<Violation>,
    ) {
        let mut seen: BTreeMap<usize, usize> = BTreeMap::new();
        for ordinal in plan.ordinals() {
            *seen.entry(ordinal).or_insert(0) += 1;
        }
        for item in original {
            match seen.get(&item.ordinal) {
                None => violations.push(Violation::MissingLine {
                    ordinal: item.ordinal,
                }),
                Some(1) => {}
                Some(n) => violations.push(Violation::DuplicateLine {
                    ordinal: item.ordinal,
                    occurrences: *n,
                }),
            }
        }
    }

    /// Plan charge total equals the input total within the tolerance
    fn check_charges(
        &self,
        original: &[LineItem],
        plan: &SplitPlan,
        violations: &mut Vec<Violation>,
    ) {
        let expected: Money = original.iter().map(|i| i.charge_amount).sum();
        let actual = plan.total_charges();
        if expected.abs_diff(&actual) > self.tolerance {
            violations.push(Violation::ChargeTotalMismatch { expected, actual });
        }
    }

    /// Line counts respect the limit unless a forced split justifies it
    fn check_line_limits(
        &self,
        plan: &SplitPlan,
        forced_groups: &BTreeSet<usize>,
        violations: &mut Vec<Violation>,
    ) {
        for claim in &plan.claims {
            if claim.line_count() <= self.max_lines {
                continue;
            }
            let justified = claim.lines.iter().any(|l| forced_groups.contains(&l.group));
            if !justified {
                violations.push(Violation::LineLimitExceeded {
                    claim_reference: claim.reference(),
                    lines: claim.line_count(),
                    limit: self.max_lines,
                });
            }
        }
    }

    /// No group straddles claims unless a forced split justifies it
    fn check_group_membership(
        &self,
        plan: &SplitPlan,
        forced_groups: &BTreeSet<usize>,
        violations: &mut Vec<Violation>,
    ) {
        let mut claims_per_group: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        for (ci, claim) in plan.claims.iter().enumerate() {
            for line in &claim.lines {
                claims_per_group.entry(line.group).or_default().insert(ci);
            }
        }
        for (group, claims) in claims_per_group {
            if claims.len() > 1 && !forced_groups.contains(&group) {
                violations.push(Violation::GroupSplitAcrossClaims {
                    group,
                    claim_count: claims.len(),
                });
            }
        }
    }
}
