//! Splitting configuration
//!
//! The engine consumes an explicit configuration value object: the line
//! limit, the two proximity windows, the code classification table, and the
//! category priority table. All components receive it read-only; nothing
//! mutates configuration during a run. Validation is fail-fast - a run is
//! never started against a bad configuration.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use core_kernel::HourWindow;

use crate::classifier::ServiceCategory;
use crate::error::SplitError;

/// Default line limit per output claim (payer form constraint)
pub const DEFAULT_MAX_LINES: usize = 28;

/// How input rows are partitioned into independent processing scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupingScope {
    /// One scope per (patient, claim) pair
    #[default]
    PerClaim,
    /// One scope per patient, collapsing claim numbers
    PerPatient,
}

/// An inclusive revenue code range mapped to a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRange {
    pub start: u16,
    pub end: u16,
    pub category: ServiceCategory,
}

impl RevenueRange {
    pub fn new(start: u16, end: u16, category: ServiceCategory) -> Self {
        Self {
            start,
            end,
            category,
        }
    }

    fn matches(&self, code: u16) -> bool {
        code >= self.start && code <= self.end
    }
}

/// The code-to-category classification table
///
/// Lookups are pure and total; the table is immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTable {
    /// Revenue code ranges, checked first
    pub revenue_ranges: Vec<RevenueRange>,
    /// Exact HCPCS code matches
    pub hcpcs_codes: HashMap<String, ServiceCategory>,
    /// HCPCS prefix matches (e.g. `J` drug codes), checked after exact codes
    pub hcpcs_prefixes: Vec<(String, ServiceCategory)>,
    /// Case-insensitive description keywords, checked last
    pub keywords: Vec<(String, ServiceCategory)>,
}

impl CodeTable {
    /// The built-in UB-04 revenue ranges and common HCPCS codes
    pub fn standard() -> Self {
        STANDARD_CODE_TABLE.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.revenue_ranges.is_empty()
            && self.hcpcs_codes.is_empty()
            && self.hcpcs_prefixes.is_empty()
            && self.keywords.is_empty()
    }

    /// Category for a revenue code, if any range matches
    pub fn revenue_category(&self, code: &str) -> Option<ServiceCategory> {
        let numeric: u16 = code.trim().parse().ok()?;
        self.revenue_ranges
            .iter()
            .find(|range| range.matches(numeric))
            .map(|range| range.category)
    }

    /// Category for a HCPCS code: exact matches win over prefixes
    pub fn hcpcs_category(&self, code: &str) -> Option<ServiceCategory> {
        let code = code.trim();
        if let Some(category) = self.hcpcs_codes.get(code) {
            return Some(*category);
        }
        self.hcpcs_prefixes
            .iter()
            .find(|(prefix, _)| code.starts_with(prefix.as_str()))
            .map(|(_, category)| *category)
    }

    /// Category for a description, by case-insensitive substring match
    pub fn keyword_category(&self, description: &str) -> Option<ServiceCategory> {
        let upper = description.to_uppercase();
        self.keywords
            .iter()
            .find(|(keyword, _)| upper.contains(keyword.as_str()))
            .map(|(_, category)| *category)
    }
}

static STANDARD_CODE_TABLE: Lazy<CodeTable> = Lazy::new(|| {
    use ServiceCategory::*;

    let revenue_ranges = vec![
        RevenueRange::new(450, 459, EmergencyRoom),
        RevenueRange::new(360, 369, Surgical),
        RevenueRange::new(370, 379, Surgical),
        RevenueRange::new(200, 209, IntensiveCare),
        RevenueRange::new(350, 359, Imaging),
        RevenueRange::new(300, 309, Laboratory),
    ];

    let mut hcpcs_codes = HashMap::new();
    for code in ["99281", "99282", "99283", "99284", "99285"] {
        hcpcs_codes.insert(code.to_string(), EmergencyRoom);
    }
    for code in [
        "70450", "70460", "70470", // CT head
        "70551", "70552", "70553", // MRI brain
        "71250", "71260", "71270", // CT chest
        "72148", "72149", "72158", // MRI spine
        "73700", "73701", "73702", // CT extremities
        "76700", "76705", // ultrasound
        "78015", "78016", // thyroid scan
    ] {
        hcpcs_codes.insert(code.to_string(), Imaging);
    }
    for code in [
        "36415", // venipuncture
        "80053", "80048", "80061", // metabolic panels
        "85025", "85027", // CBC
        "84484", "82947",
    ] {
        hcpcs_codes.insert(code.to_string(), Laboratory);
    }

    let hcpcs_prefixes = vec![("J".to_string(), Medication)];

    let keywords = vec![
        ("EMERGENCY".to_string(), EmergencyRoom),
        ("ER ".to_string(), EmergencyRoom),
        ("SURGERY".to_string(), Surgical),
        ("PROCEDURE".to_string(), Surgical),
        ("ICU".to_string(), IntensiveCare),
        ("INTENSIVE".to_string(), IntensiveCare),
        ("CT ".to_string(), Imaging),
        ("MRI".to_string(), Imaging),
        ("SCAN".to_string(), Imaging),
        ("LAB".to_string(), Laboratory),
        ("INJECTION".to_string(), Medication),
        ("INFUSION".to_string(), Medication),
    ];

    CodeTable {
        revenue_ranges,
        hcpcs_codes,
        hcpcs_prefixes,
        keywords,
    }
});

/// Category-to-priority table (lower value = higher clinical precedence)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTable {
    priorities: BTreeMap<ServiceCategory, u8>,
    /// Priority used for categories absent from the table
    fallback: u8,
}

impl PriorityTable {
    pub fn new(priorities: BTreeMap<ServiceCategory, u8>, fallback: u8) -> Self {
        Self {
            priorities,
            fallback,
        }
    }

    /// The standard clinical ladder: ER first, everything else last
    pub fn standard() -> Self {
        let priorities = ServiceCategory::ALL
            .iter()
            .enumerate()
            .map(|(i, category)| (*category, i as u8 + 1))
            .collect();
        Self {
            priorities,
            fallback: ServiceCategory::ALL.len() as u8,
        }
    }

    pub fn priority(&self, category: ServiceCategory) -> u8 {
        self.priorities
            .get(&category)
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }

    /// Categories missing from the table
    pub fn missing_categories(&self) -> Vec<ServiceCategory> {
        ServiceCategory::ALL
            .iter()
            .filter(|category| !self.priorities.contains_key(category))
            .copied()
            .collect()
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Configuration consumed by the splitting engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Maximum line items per output claim
    pub max_lines_per_claim: usize,
    /// Window within which two ER visits consolidate into one visit group
    pub er_consolidation: HourWindow,
    /// Window within which ancillary services attach to an ER anchor
    pub imaging_grouping: HourWindow,
    /// Processing scope
    pub scope: GroupingScope,
    /// Code classification table
    pub code_table: CodeTable,
    /// Category priority table
    pub priorities: PriorityTable,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_lines_per_claim: DEFAULT_MAX_LINES,
            er_consolidation: HourWindow::default(),
            imaging_grouping: HourWindow::default(),
            scope: GroupingScope::default(),
            code_table: CodeTable::standard(),
            priorities: PriorityTable::standard(),
        }
    }
}

impl SplitConfig {
    /// Validates the configuration, failing fast on anything out of range
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.max_lines_per_claim == 0 {
            return Err(SplitError::configuration(
                "max_lines_per_claim must be at least 1",
            ));
        }
        if self.code_table.is_empty() {
            return Err(SplitError::configuration(
                "code classification table is empty",
            ));
        }
        if self.priorities.is_empty() {
            return Err(SplitError::configuration("priority table is empty"));
        }
        let missing = self.priorities.missing_categories();
        if !missing.is_empty() {
            return Err(SplitError::configuration(format!(
                "priority table is missing categories: {:?}",
                missing
            )));
        }
        Ok(())
    }
}
