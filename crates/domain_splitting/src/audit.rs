//! Structured audit trail
//!
//! Every rule the pipeline applies is captured as a [`DecisionRecord`]:
//! which rule fired, which original rows it touched, and the structured
//! facts a downstream renderer needs to narrate the decision. The trail is
//! append-only for the duration of one run; prose generation is entirely
//! the caller's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{DecisionId, RunId, SourceClaimKey};

/// A business rule applied by the pipeline, with its structured facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleApplied {
    /// Multiple ER visits merged into one visit group
    ConsolidatedEr {
        merged_visits: usize,
        window_hours: i64,
    },
    /// Ancillary services absorbed into an ER-anchored group
    GroupedImaging {
        anchor_ordinal: usize,
        absorbed: usize,
        window_hours: i64,
    },
    /// Visit groups put into final clinical priority order
    PriorityOrdered { groups: usize },
    /// Output claim closed at a visit-group boundary
    SplitAtBoundary { part: u32, lines: usize },
    /// A single group exceeded the line limit and was split internally
    ForcedSplit { group: usize, parts: usize },
    /// Integrity validation passed for the plan
    ValidationPassed,
    /// Integrity validation reported violations
    ValidationFailed { violations: usize },
}

/// One structured audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: DecisionId,
    /// The source claim this decision was made for
    pub source: SourceClaimKey,
    pub rule: RuleApplied,
    /// Original row ordinals affected by the decision
    pub affected_ordinals: Vec<usize>,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only list of decisions for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrail {
    run_id: RunId,
    records: Vec<DecisionRecord>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self {
            run_id: RunId::new_v7(),
            records: Vec::new(),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Appends a decision
    pub fn record(
        &mut self,
        source: &SourceClaimKey,
        rule: RuleApplied,
        affected_ordinals: Vec<usize>,
    ) {
        tracing::debug!(claim = %source, rule = ?rule, "rule applied");
        self.records.push(DecisionRecord {
            id: DecisionId::new_v7(),
            source: source.clone(),
            rule,
            affected_ordinals,
            recorded_at: Utc::now(),
        });
    }

    pub fn records(&self) -> &[DecisionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for one source claim
    pub fn for_source<'a>(
        &'a self,
        source: &'a SourceClaimKey,
    ) -> impl Iterator<Item = &'a DecisionRecord> {
        self.records.iter().filter(move |r| &r.source == source)
    }

    /// Group indices covered by a `ForcedSplit` record for this source claim
    pub fn forced_split_groups(&self, source: &SourceClaimKey) -> BTreeSet<usize> {
        self.for_source(source)
            .filter_map(|record| match record.rule {
                RuleApplied::ForcedSplit { group, .. } => Some(group),
                _ => None,
            })
            .collect()
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
