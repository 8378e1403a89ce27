//! Supply catalog models
//!
//! A catalog item is a priceable resource (a material, a piece of equipment,
//! a labor crew, a transport service). Catalog items live in the catalog and
//! are only ever referenced by line items through a denormalized snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The resource category of a catalog item
///
/// The category selects the pricing rule applied to a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Materials,
    Equipment,
    Labor,
    Transport,
}

impl ResourceCategory {
    /// All categories in display order
    pub fn all() -> &'static [Self] {
        &[Self::Materials, Self::Equipment, Self::Labor, Self::Transport]
    }

    /// Wire name of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Materials => "materials",
            Self::Equipment => "equipment",
            Self::Labor => "labor",
            Self::Transport => "transport",
        }
    }

    /// Human-readable heading for reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Materials => "Materials",
            Self::Equipment => "Equipment",
            Self::Labor => "Labor",
            Self::Transport => "Transport",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "materials" | "material" | "materiales" => Ok(Self::Materials),
            "equipment" | "equipo" | "equipos" => Ok(Self::Equipment),
            "labor" | "labour" | "mano_obra" | "mano-de-obra" => Ok(Self::Labor),
            "transport" | "transporte" => Ok(Self::Transport),
            other => Err(format!(
                "Unknown category '{}' (expected materials, equipment, labor or transport)",
                other
            )),
        }
    }
}

/// A priceable resource from a supply catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Catalog-assigned identifier
    pub id: u64,

    /// Display name
    pub name: String,

    /// Unit of measure (e.g., "m3", "bag", "day")
    pub unit: String,

    /// Unit price
    pub unit_price: Decimal,

    /// Resource category
    pub category: ResourceCategory,

    /// Supplier classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_type: Option<String>,

    /// When the item was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the item was last modified
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Create a new catalog item
    pub fn new(
        id: u64,
        name: impl Into<String>,
        unit: impl Into<String>,
        unit_price: Decimal,
        category: ResourceCategory,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            unit: unit.into(),
            unit_price,
            category,
            supplier_type: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the supplier classification
    pub fn with_supplier_type(mut self, supplier_type: impl Into<String>) -> Self {
        self.supplier_type = Some(supplier_type.into());
        self
    }

    /// Change the unit price
    pub fn set_unit_price(&mut self, unit_price: Decimal) {
        self.unit_price = unit_price;
        self.updated_at = Utc::now();
    }

    /// Validate the item
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.name.trim().is_empty() {
            return Err(CatalogValidationError::EmptyName);
        }

        if self.unit.trim().is_empty() {
            return Err(CatalogValidationError::EmptyUnit);
        }

        if self.unit_price < Decimal::ZERO {
            return Err(CatalogValidationError::NegativePrice);
        }

        Ok(())
    }
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.name, self.unit)
    }
}

/// Validation errors for catalog items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValidationError {
    EmptyName,
    EmptyUnit,
    NegativePrice,
}

impl fmt::Display for CatalogValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Catalog item name cannot be empty"),
            Self::EmptyUnit => write!(f, "Catalog item unit cannot be empty"),
            Self::NegativePrice => write!(f, "Unit price cannot be negative"),
        }
    }
}

impl std::error::Error for CatalogValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item() {
        let item = CatalogItem::new(1, "Cement", "bag", Decimal::new(3250, 2), ResourceCategory::Materials)
            .with_supplier_type("wholesale");
        assert_eq!(item.id, 1);
        assert_eq!(item.unit_price, Decimal::new(3250, 2));
        assert_eq!(item.supplier_type.as_deref(), Some("wholesale"));
        assert_eq!(item.to_string(), "#1 Cement (bag)");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("materials".parse::<ResourceCategory>(), Ok(ResourceCategory::Materials));
        assert_eq!("Labor".parse::<ResourceCategory>(), Ok(ResourceCategory::Labor));
        assert_eq!("transporte".parse::<ResourceCategory>(), Ok(ResourceCategory::Transport));
        assert!("tools".parse::<ResourceCategory>().is_err());
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ResourceCategory::Equipment).unwrap();
        assert_eq!(json, "\"equipment\"");
    }

    #[test]
    fn test_validation() {
        let mut item = CatalogItem::new(1, "Sand", "m3", Decimal::new(45, 0), ResourceCategory::Materials);
        assert!(item.validate().is_ok());

        item.name = "  ".into();
        assert_eq!(item.validate(), Err(CatalogValidationError::EmptyName));

        item.name = "Sand".into();
        item.unit = String::new();
        assert_eq!(item.validate(), Err(CatalogValidationError::EmptyUnit));

        item.unit = "m3".into();
        item.unit_price = Decimal::new(-1, 0);
        assert_eq!(item.validate(), Err(CatalogValidationError::NegativePrice));
    }

    #[test]
    fn test_boundary_shape() {
        let item = CatalogItem::new(4, "Truck", "trip", Decimal::new(4500, 0), ResourceCategory::Transport);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["unitPrice"], "4500");
        assert_eq!(json["category"], "transport");
        assert!(json.get("supplierType").is_none());
    }
}
