//! Temporal visit grouping
//!
//! Clusters a claim's classified items into visit groups by service-date
//! proximity. ER visits open groups; chains of ER visits each within the
//! consolidation window of the previous one merge into a single group
//! anchored at the earliest visit. Any other item inside the association
//! window of an anchor is absorbed into that anchor's group; an item
//! equidistant between two anchors goes to the earlier one. Whatever is
//! left becomes its own singleton group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{HourWindow, SourceClaimKey};

use crate::audit::{AuditTrail, RuleApplied};
use crate::classifier::{ClassifiedItem, ServiceCategory};
use crate::config::SplitConfig;

/// A cluster of clinically related line items
///
/// Groups partition the classified items of one claim: every item belongs
/// to exactly one group. ER-anchored groups carry the anchor visit's
/// priority; a singleton group carries its only item's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitGroup {
    /// Service time of the anchor (earliest ER visit, or the single item)
    pub anchor_time: DateTime<Utc>,
    /// Priority inherited from the anchor
    pub priority: u8,
    /// Whether the group was opened by an ER visit
    pub er_anchored: bool,
    pub members: Vec<ClassifiedItem>,
}

impl VisitGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Original ordinals of all members
    pub fn member_ordinals(&self) -> BTreeSet<usize> {
        self.members.iter().map(|m| m.ordinal()).collect()
    }

    /// Lowest original ordinal, used as the stable tie-break key
    pub fn first_ordinal(&self) -> usize {
        self.members
            .iter()
            .map(|m| m.ordinal())
            .min()
            .unwrap_or(usize::MAX)
    }

    fn singleton(item: ClassifiedItem) -> Self {
        Self {
            anchor_time: item.service_date(),
            priority: item.priority,
            er_anchored: item.category == ServiceCategory::EmergencyRoom,
            members: vec![item],
        }
    }
}

/// Clusters classified items into visit groups
#[derive(Debug, Clone)]
pub struct TemporalGrouper {
    er_consolidation: HourWindow,
    imaging_grouping: HourWindow,
}

impl TemporalGrouper {
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            er_consolidation: config.er_consolidation,
            imaging_grouping: config.imaging_grouping,
        }
    }

    /// Groups one claim's items; empty input yields empty output
    pub fn group(
        &self,
        source: &SourceClaimKey,
        mut items: Vec<ClassifiedItem>,
        audit: &mut AuditTrail,
    ) -> Vec<VisitGroup> {
        if items.is_empty() {
            return Vec::new();
        }
        items.sort_by(|a, b| {
            a.service_date()
                .cmp(&b.service_date())
                .then(a.ordinal().cmp(&b.ordinal()))
        });

        let mut assigned = vec![false; items.len()];
        let mut groups = self.consolidate_er_chains(source, &items, &mut assigned, audit);
        self.absorb_into_anchors(source, &items, &mut assigned, &mut groups, audit);

        // Everything still unassigned stands alone
        for (idx, item) in items.iter().enumerate() {
            if !assigned[idx] {
                groups.push(VisitGroup::singleton(item.clone()));
            }
        }

        groups.sort_by(|a, b| {
            a.anchor_time
                .cmp(&b.anchor_time)
                .then(a.first_ordinal().cmp(&b.first_ordinal()))
        });
        groups
    }

    /// Opens a group per ER visit and merges transitive chains
    ///
    /// Consolidation is transitive: each ER visit within the window of the
    /// previous chain member joins the chain, so a chain can span more than
    /// one window end to end. The anchor is the earliest visit.
    fn consolidate_er_chains(
        &self,
        source: &SourceClaimKey,
        items: &[ClassifiedItem],
        assigned: &mut [bool],
        audit: &mut AuditTrail,
    ) -> Vec<VisitGroup> {
        let er_indices: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.category == ServiceCategory::EmergencyRoom)
            .map(|(idx, _)| idx)
            .collect();

        let mut groups = Vec::new();
        let mut cursor = 0;
        while cursor < er_indices.len() {
            let head = er_indices[cursor];
            let mut chain = vec![head];
            let mut last_time = items[head].service_date();
            let mut next = cursor + 1;
            while next < er_indices.len() {
                let candidate = er_indices[next];
                let candidate_time = items[candidate].service_date();
                if !self.er_consolidation.contains(last_time, candidate_time) {
                    break;
                }
                chain.push(candidate);
                last_time = candidate_time;
                next += 1;
            }
            cursor = next;

            for idx in &chain {
                assigned[*idx] = true;
            }
            let members: Vec<ClassifiedItem> =
                chain.iter().map(|idx| items[*idx].clone()).collect();
            if members.len() > 1 {
                audit.record(
                    source,
                    RuleApplied::ConsolidatedEr {
                        merged_visits: members.len(),
                        window_hours: self.er_consolidation.hours(),
                    },
                    members.iter().map(|m| m.ordinal()).collect(),
                );
            }
            groups.push(VisitGroup {
                anchor_time: members[0].service_date(),
                priority: members[0].priority,
                er_anchored: true,
                members,
            });
        }
        groups
    }

    /// Attaches non-ER items to the nearest anchor inside the window
    fn absorb_into_anchors(
        &self,
        source: &SourceClaimKey,
        items: &[ClassifiedItem],
        assigned: &mut [bool],
        groups: &mut [VisitGroup],
        audit: &mut AuditTrail,
    ) {
        if groups.is_empty() {
            return;
        }
        let mut absorbed_per_group: Vec<Vec<usize>> = vec![Vec::new(); groups.len()];

        for (idx, item) in items.iter().enumerate() {
            if assigned[idx] {
                continue;
            }
            let when = item.service_date();
            // groups are in ascending anchor order, so the first minimal
            // distance is the earlier anchor on a tie
            let best = groups
                .iter()
                .enumerate()
                .filter(|(_, g)| self.imaging_grouping.contains(g.anchor_time, when))
                .min_by_key(|(_, g)| self.imaging_grouping.distance(g.anchor_time, when));
            if let Some((gi, _)) = best {
                assigned[idx] = true;
                absorbed_per_group[gi].push(idx);
            }
        }

        for (gi, absorbed) in absorbed_per_group.into_iter().enumerate() {
            if absorbed.is_empty() {
                continue;
            }
            audit.record(
                source,
                RuleApplied::GroupedImaging {
                    anchor_ordinal: groups[gi].first_ordinal(),
                    absorbed: absorbed.len(),
                    window_hours: self.imaging_grouping.hours(),
                },
                absorbed.iter().map(|idx| items[*idx].ordinal()).collect(),
            );
            for idx in absorbed {
                groups[gi].members.push(items[idx].clone());
            }
        }
    }
}
