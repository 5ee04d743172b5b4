//! Split planning
//!
//! Greedy bin packing over ordered visit groups with boundary preference:
//! groups are accumulated into the current output claim and the claim is
//! closed when the next group would exceed the line limit, so cuts land on
//! group boundaries. The one exception is a group that alone exceeds the
//! limit - it is force-split at the item level (keeping its internal
//! priority order) and a `ForcedSplit` decision is recorded. No group or
//! item is ever dropped, and no output claim is ever empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{ClaimNumber, Money, SourceClaimKey};

use crate::audit::{AuditTrail, RuleApplied};
use crate::classifier::ClassifiedItem;
use crate::grouping::VisitGroup;

/// One output line: a classified item plus the visit group it came from
///
/// The group index points into [`SplitPlan::groups`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimLine {
    pub group: usize,
    pub item: ClassifiedItem,
}

/// One output claim of a split plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputClaim {
    /// Parent claim number; parts share it and differ by suffix
    pub claim_number: ClaimNumber,
    /// 1-based part index within the plan
    pub part: u32,
    pub lines: Vec<ClaimLine>,
}

impl OutputClaim {
    /// Traceable reference, e.g. `C100-02`
    pub fn reference(&self) -> String {
        format!("{}-{:02}", self.claim_number, self.part)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_charges(&self) -> Money {
        self.lines.iter().map(|l| l.item.charge_amount()).sum()
    }

    pub fn ordinals(&self) -> Vec<usize> {
        self.lines.iter().map(|l| l.item.ordinal()).collect()
    }
}

/// Digest of a visit group for integrity checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDigest {
    pub anchor_time: DateTime<Utc>,
    pub ordinals: BTreeSet<usize>,
    /// True when the group had to be split across output claims
    pub forced: bool,
}

/// An ordered sequence of output claims for one source claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    pub source: SourceClaimKey,
    pub claims: Vec<OutputClaim>,
    /// Digests of the groups the plan was built from, in plan order
    pub groups: Vec<GroupDigest>,
}

impl SplitPlan {
    pub fn line_count(&self) -> usize {
        self.claims.iter().map(|c| c.line_count()).sum()
    }

    pub fn total_charges(&self) -> Money {
        self.claims.iter().map(|c| c.total_charges()).sum()
    }

    /// All ordinals across the plan, in output order
    pub fn ordinals(&self) -> Vec<usize> {
        self.claims.iter().flat_map(|c| c.ordinals()).collect()
    }

    /// True when the source claim was split into more than one output claim
    pub fn was_split(&self) -> bool {
        self.claims.len() > 1
    }
}

/// Partitions ordered visit groups into output claims
#[derive(Debug, Clone, Copy)]
pub struct SplitPlanner {
    max_lines: usize,
}

impl SplitPlanner {
    /// `max_lines` must come from a validated configuration (>= 1)
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }

    /// Plans the partition of one source claim
    pub fn plan(
        &self,
        source: &SourceClaimKey,
        groups: Vec<VisitGroup>,
        audit: &mut AuditTrail,
    ) -> SplitPlan {
        let mut plan = SplitPlan {
            source: source.clone(),
            claims: Vec::new(),
            groups: Vec::with_capacity(groups.len()),
        };
        let mut current: Vec<ClaimLine> = Vec::new();

        for (gi, group) in groups.into_iter().enumerate() {
            plan.groups.push(GroupDigest {
                anchor_time: group.anchor_time,
                ordinals: group.member_ordinals(),
                forced: false,
            });
            let lines: Vec<ClaimLine> = group
                .members
                .into_iter()
                .map(|item| ClaimLine { group: gi, item })
                .collect();

            if lines.len() > self.max_lines {
                self.force_split(source, &mut plan, &mut current, gi, lines, audit);
            } else {
                if !current.is_empty() && current.len() + lines.len() > self.max_lines {
                    self.close(source, &mut plan, &mut current, audit, true);
                }
                current.extend(lines);
            }
        }
        if !current.is_empty() {
            self.close(source, &mut plan, &mut current, audit, false);
        }
        plan
    }

    /// Splits an oversized group at the item level
    ///
    /// Full chunks are closed immediately; the final partial chunk stays
    /// open so following groups can still fill the claim.
    fn force_split(
        &self,
        source: &SourceClaimKey,
        plan: &mut SplitPlan,
        current: &mut Vec<ClaimLine>,
        group_index: usize,
        lines: Vec<ClaimLine>,
        audit: &mut AuditTrail,
    ) {
        if !current.is_empty() {
            self.close(source, plan, current, audit, true);
        }
        let parts = lines.len().div_ceil(self.max_lines);
        audit.record(
            source,
            RuleApplied::ForcedSplit {
                group: group_index,
                parts,
            },
            lines.iter().map(|l| l.item.ordinal()).collect(),
        );
        plan.groups[group_index].forced = true;

        let mut rest = lines;
        while rest.len() > self.max_lines {
            let tail = rest.split_off(self.max_lines);
            *current = rest;
            self.close(source, plan, current, audit, false);
            rest = tail;
        }
        *current = rest;
    }

    fn close(
        &self,
        source: &SourceClaimKey,
        plan: &mut SplitPlan,
        current: &mut Vec<ClaimLine>,
        audit: &mut AuditTrail,
        at_boundary: bool,
    ) {
        let part = plan.claims.len() as u32 + 1;
        let lines = std::mem::take(current);
        if at_boundary {
            audit.record(
                source,
                RuleApplied::SplitAtBoundary {
                    part,
                    lines: lines.len(),
                },
                lines.iter().map(|l| l.item.ordinal()).collect(),
            );
        }
        plan.claims.push(OutputClaim {
            claim_number: source.claim_number.clone(),
            part,
            lines,
        });
    }
}
