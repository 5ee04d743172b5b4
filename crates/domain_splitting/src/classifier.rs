//! Service code classification
//!
//! Maps a line item's revenue/HCPCS codes and description to a semantic
//! service category and a clinical priority. Classification is pure and
//! total: a row that matches nothing is `Other` with the configured
//! fallback priority, never an error.

use serde::{Deserialize, Serialize};

use crate::config::{CodeTable, PriorityTable, SplitConfig};
use crate::line_item::LineItem;

/// Semantic category of a billed service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    EmergencyRoom,
    Surgical,
    IntensiveCare,
    Imaging,
    Laboratory,
    Medication,
    Other,
}

impl ServiceCategory {
    /// All categories, in default clinical priority order
    pub const ALL: [ServiceCategory; 7] = [
        ServiceCategory::EmergencyRoom,
        ServiceCategory::Surgical,
        ServiceCategory::IntensiveCare,
        ServiceCategory::Imaging,
        ServiceCategory::Laboratory,
        ServiceCategory::Medication,
        ServiceCategory::Other,
    ];

    /// Human-readable label used in summaries
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::EmergencyRoom => "Emergency Room Visits",
            ServiceCategory::Surgical => "Surgical Procedures",
            ServiceCategory::IntensiveCare => "ICU Services",
            ServiceCategory::Imaging => "Imaging Services",
            ServiceCategory::Laboratory => "Laboratory Tests",
            ServiceCategory::Medication => "Medications/Infusions",
            ServiceCategory::Other => "Other Services",
        }
    }
}

/// A line item annotated with its derived category and priority
///
/// Derived once per run and never mutated afterwards. Lower priority values
/// are processed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub item: LineItem,
    pub category: ServiceCategory,
    pub priority: u8,
}

impl ClassifiedItem {
    pub fn ordinal(&self) -> usize {
        self.item.ordinal
    }

    pub fn service_date(&self) -> chrono::DateTime<chrono::Utc> {
        self.item.service_date
    }

    pub fn charge_amount(&self) -> core_kernel::Money {
        self.item.charge_amount
    }
}

/// Classifies line items against the configured code tables
///
/// Precedence when multiple signals match: revenue code range, then HCPCS
/// code/prefix, then description keyword, then `Other`.
#[derive(Debug, Clone)]
pub struct CodeClassifier<'a> {
    codes: &'a CodeTable,
    priorities: &'a PriorityTable,
}

impl<'a> CodeClassifier<'a> {
    pub fn new(config: &'a SplitConfig) -> Self {
        Self {
            codes: &config.code_table,
            priorities: &config.priorities,
        }
    }

    /// Determines the category of a line item
    pub fn category_of(&self, item: &LineItem) -> ServiceCategory {
        if let Some(code) = item.revenue_code.as_deref() {
            if let Some(category) = self.codes.revenue_category(code) {
                return category;
            }
        }
        if let Some(code) = item.hcpcs_code.as_deref() {
            if let Some(category) = self.codes.hcpcs_category(code) {
                return category;
            }
        }
        if let Some(category) = self.codes.keyword_category(&item.description) {
            return category;
        }
        ServiceCategory::Other
    }

    /// Annotates a line item with category and priority
    pub fn classify(&self, item: LineItem) -> ClassifiedItem {
        let category = self.category_of(&item);
        let priority = self.priorities.priority(category);
        ClassifiedItem {
            item,
            category,
            priority,
        }
    }
}
