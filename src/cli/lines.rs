//! Argument helpers shared by the analysis and budget commands

use clap::Args;

use crate::error::{ApuError, ApuResult};
use crate::models::ResourceCategory;
use crate::services::{CatalogService, LineUpdate};
use crate::storage::Storage;

/// Line field changes; numbers are coerced, so "abc" counts as unset
#[derive(Args, Debug, Clone, Default)]
pub struct LineFields {
    /// Quantity consumed
    #[arg(short, long, allow_hyphen_values = true)]
    pub quantity: Option<String>,

    /// Waste percentage (materials only)
    #[arg(short, long, allow_hyphen_values = true)]
    pub waste: Option<String>,

    /// Performance divisor (labor and equipment only)
    #[arg(short, long, allow_hyphen_values = true)]
    pub performance: Option<String>,
}

impl LineFields {
    /// Convert to a service update, optionally moving the line to a section
    pub fn into_update(self, section: Option<String>) -> LineUpdate {
        LineUpdate {
            quantity: self.quantity,
            waste: self.waste,
            performance: self.performance,
            section,
        }
    }
}

/// Parse a resource category argument
pub fn parse_category(value: &str) -> ApuResult<ResourceCategory> {
    value.parse().map_err(ApuError::Validation)
}

/// Parse an optional resource category argument
pub fn parse_optional_category(value: Option<&str>) -> ApuResult<Option<ResourceCategory>> {
    value.map(parse_category).transpose()
}

/// Resolve a catalog item argument ("3", "#3" or an item name) to its ID
pub fn resolve_catalog_id(storage: &Storage, identifier: &str) -> ApuResult<u64> {
    CatalogService::new(storage)
        .find(identifier)?
        .map(|item| item.id)
        .ok_or_else(|| ApuError::catalog_item_not_found(identifier))
}

/// Parse the catalog ID of an existing line ("3" or "#3")
///
/// The catalog item itself may have been deleted since the line was added,
/// so the ID is not looked up.
pub fn parse_line_id(identifier: &str) -> ApuResult<u64> {
    identifier
        .trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| ApuError::Validation(format!("Invalid catalog item ID: '{}'", identifier)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_id() {
        assert_eq!(parse_line_id("7").unwrap(), 7);
        assert_eq!(parse_line_id(" #12 ").unwrap(), 12);
        assert!(parse_line_id("cement").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("Labor").unwrap(), ResourceCategory::Labor);
        assert_eq!(parse_optional_category(None).unwrap(), None);
        assert!(parse_category("steel").is_err());
    }

    #[test]
    fn test_into_update() {
        let fields = LineFields {
            quantity: Some("2".into()),
            ..Default::default()
        };
        let update = fields.into_update(Some("Structure".into()));
        assert_eq!(update.quantity.as_deref(), Some("2"));
        assert!(update.waste.is_none());
        assert_eq!(update.section.as_deref(), Some("Structure"));
    }
}
