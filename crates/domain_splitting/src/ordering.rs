//! Clinical priority ordering
//!
//! Produces a total order over visit groups, and over items within each
//! group. The sort key is (priority, time, original ordinal) applied
//! consistently, so identical input always yields identical output order.

use core_kernel::SourceClaimKey;

use crate::audit::{AuditTrail, RuleApplied};
use crate::grouping::VisitGroup;

/// Orders visit groups and their members
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityOrderer;

impl PriorityOrderer {
    pub fn new() -> Self {
        Self
    }

    /// Sorts groups by (priority, anchor time, first ordinal) and members
    /// within each group by (priority, service date, ordinal)
    pub fn order(
        &self,
        source: &SourceClaimKey,
        mut groups: Vec<VisitGroup>,
        audit: &mut AuditTrail,
    ) -> Vec<VisitGroup> {
        if groups.is_empty() {
            return groups;
        }
        for group in &mut groups {
            group.members.sort_by(|a, b| {
                a.priority
                    .cmp(&b.priority)
                    .then(a.service_date().cmp(&b.service_date()))
                    .then(a.ordinal().cmp(&b.ordinal()))
            });
        }
        groups.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.anchor_time.cmp(&b.anchor_time))
                .then(a.first_ordinal().cmp(&b.first_ordinal()))
        });

        let ordered_ordinals: Vec<usize> = groups
            .iter()
            .flat_map(|g| g.members.iter().map(|m| m.ordinal()))
            .collect();
        audit.record(
            source,
            RuleApplied::PriorityOrdered {
                groups: groups.len(),
            },
            ordered_ordinals,
        );
        groups
    }
}
