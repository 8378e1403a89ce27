//! Line item model
//!
//! A line item binds a catalog item into an analysis or budget with a
//! quantity and the adjustment factor its category calls for. The extended
//! total is never stored: `LineItem::total` prices the line on every call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::{CatalogItem, ResourceCategory};
use super::ids::SectionId;
use crate::pricing::pricer;

/// Category-specific pricing adjustment
///
/// Each variant carries only the factor its pricing rule reads, so a labor
/// line cannot hold a waste percentage and a material line cannot hold a
/// performance divisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Adjustment {
    /// Waste percentage applied multiplicatively
    Materials {
        #[serde(rename = "wastePercentage", default)]
        waste_percentage: Decimal,
    },
    /// Performance divisor
    Equipment {
        #[serde(rename = "performanceDivisor", default = "default_performance")]
        performance: Decimal,
    },
    /// Performance divisor
    Labor {
        #[serde(rename = "performanceDivisor", default = "default_performance")]
        performance: Decimal,
    },
    Transport,
}

fn default_performance() -> Decimal {
    Decimal::ONE
}

impl Adjustment {
    /// Default adjustment for a newly added line of the given category
    pub fn default_for(category: ResourceCategory) -> Self {
        match category {
            ResourceCategory::Materials => Self::Materials {
                waste_percentage: Decimal::ZERO,
            },
            ResourceCategory::Equipment => Self::Equipment {
                performance: Decimal::ONE,
            },
            ResourceCategory::Labor => Self::Labor {
                performance: Decimal::ONE,
            },
            ResourceCategory::Transport => Self::Transport,
        }
    }

    /// The category this adjustment belongs to
    pub fn category(&self) -> ResourceCategory {
        match self {
            Self::Materials { .. } => ResourceCategory::Materials,
            Self::Equipment { .. } => ResourceCategory::Equipment,
            Self::Labor { .. } => ResourceCategory::Labor,
            Self::Transport => ResourceCategory::Transport,
        }
    }
}

/// Uniqueness key of a line within a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    pub catalog_item_id: u64,
    pub category: ResourceCategory,
}

impl LineKey {
    pub fn new(catalog_item_id: u64, category: ResourceCategory) -> Self {
        Self {
            catalog_item_id,
            category,
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.catalog_item_id)
    }
}

/// A catalog item bound into an analysis or budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "LineItemRecord", from = "LineItemRecord")]
pub struct LineItem {
    /// Referenced catalog item
    pub catalog_item_id: u64,

    /// Snapshot of the catalog name
    pub name: String,

    /// Snapshot of the catalog unit
    pub unit: String,

    /// Snapshot of the catalog unit price
    pub unit_price: Decimal,

    /// Quantity multiplier
    pub quantity: Decimal,

    /// Section the line belongs to (budget context only)
    pub section_id: Option<SectionId>,

    adjustment: Adjustment,
}

impl LineItem {
    /// Create a line from a catalog item with default quantity and factors
    pub fn from_catalog(item: &CatalogItem) -> Self {
        Self {
            catalog_item_id: item.id,
            name: item.name.clone(),
            unit: item.unit.clone(),
            unit_price: item.unit_price,
            quantity: Decimal::ONE,
            section_id: None,
            adjustment: Adjustment::default_for(item.category),
        }
    }

    /// Set the initial quantity
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    /// Place the line in a section
    pub fn in_section(mut self, section_id: SectionId) -> Self {
        self.section_id = Some(section_id);
        self
    }

    /// Uniqueness key
    pub fn key(&self) -> LineKey {
        LineKey::new(self.catalog_item_id, self.category())
    }

    /// Category copied from the catalog item at creation
    pub fn category(&self) -> ResourceCategory {
        self.adjustment.category()
    }

    /// The category-specific adjustment
    pub fn adjustment(&self) -> &Adjustment {
        &self.adjustment
    }

    /// Waste percentage, for material lines
    pub fn waste_percentage(&self) -> Option<Decimal> {
        match self.adjustment {
            Adjustment::Materials { waste_percentage } => Some(waste_percentage),
            _ => None,
        }
    }

    /// Performance divisor, for labor and equipment lines
    pub fn performance(&self) -> Option<Decimal> {
        match self.adjustment {
            Adjustment::Labor { performance } | Adjustment::Equipment { performance } => {
                Some(performance)
            }
            _ => None,
        }
    }

    /// Set the waste percentage; returns false for non-material lines
    pub fn set_waste_percentage(&mut self, value: Decimal) -> bool {
        match &mut self.adjustment {
            Adjustment::Materials { waste_percentage } => {
                *waste_percentage = value;
                true
            }
            _ => false,
        }
    }

    /// Set the performance divisor; returns false for material and transport lines
    pub fn set_performance(&mut self, value: Decimal) -> bool {
        match &mut self.adjustment {
            Adjustment::Labor { performance } | Adjustment::Equipment { performance } => {
                *performance = value;
                true
            }
            _ => false,
        }
    }

    /// Refresh the denormalized snapshot from the catalog
    pub fn refresh_from_catalog(&mut self, item: &CatalogItem) {
        self.name = item.name.clone();
        self.unit = item.unit.clone();
        self.unit_price = item.unit_price;
    }

    /// Extended total of this line
    pub fn total(&self) -> Decimal {
        pricer::price(self.unit_price, self.quantity, &self.adjustment)
    }
}

/// Wire shape of a line item
///
/// `total` is written for consumers and ignored when reading back.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineItemRecord {
    catalog_item_id: u64,
    name: String,
    unit: String,
    unit_price: Decimal,
    quantity: Decimal,
    #[serde(flatten)]
    adjustment: Adjustment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    section_id: Option<SectionId>,
    #[serde(default, skip_deserializing)]
    total: Decimal,
}

impl From<LineItem> for LineItemRecord {
    fn from(line: LineItem) -> Self {
        let total = line.total();
        Self {
            catalog_item_id: line.catalog_item_id,
            name: line.name,
            unit: line.unit,
            unit_price: line.unit_price,
            quantity: line.quantity,
            adjustment: line.adjustment,
            section_id: line.section_id,
            total,
        }
    }
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        Self {
            catalog_item_id: record.catalog_item_id,
            name: record.name,
            unit: record.unit,
            unit_price: record.unit_price,
            quantity: record.quantity,
            section_id: record.section_id,
            adjustment: record.adjustment,
        }
    }
}
