//! Line editing shared by analyses and budgets
//!
//! Numeric inputs arrive as text and are coerced the same way the pricer
//! coerces them: unusable quantities and waste become zero, unusable
//! performance divisors become one.

use rust_decimal::Decimal;

use crate::error::{ApuError, ApuResult};
use crate::models::numeric::parse_decimal;
use crate::models::{LineItem, LineKey, ResourceCategory};
use crate::pricing::Worksheet;
use crate::storage::Storage;

/// Field changes for one line; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct LineUpdate {
    pub quantity: Option<String>,
    pub waste: Option<String>,
    pub performance: Option<String>,
    /// Section name or ID (budgets only)
    pub section: Option<String>,
}

impl LineUpdate {
    /// Whether no field is being changed
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none()
            && self.waste.is_none()
            && self.performance.is_none()
            && self.section.is_none()
    }
}

/// Build a line from the current catalog entry
pub fn line_from_catalog(
    storage: &Storage,
    catalog_item_id: u64,
    quantity: Option<&str>,
) -> ApuResult<LineItem> {
    let item = storage
        .catalog
        .get(catalog_item_id)?
        .ok_or_else(|| ApuError::catalog_item_not_found(catalog_item_id.to_string()))?;

    let line = LineItem::from_catalog(&item);
    Ok(match quantity {
        Some(text) => line.with_quantity(parse_decimal(text).unwrap_or(Decimal::ZERO)),
        None => line,
    })
}

/// Find the line for a catalog item
///
/// The category is only needed when the same catalog ID appears under more
/// than one category.
pub fn resolve_line(
    worksheet: &Worksheet,
    catalog_item_id: u64,
    category: Option<ResourceCategory>,
) -> ApuResult<LineKey> {
    if let Some(category) = category {
        let key = LineKey::new(catalog_item_id, category);
        return worksheet
            .line(key)
            .map(LineItem::key)
            .ok_or_else(|| ApuError::line_item_not_found(catalog_item_id, category));
    }

    let mut matches = worksheet
        .lines()
        .iter()
        .filter(|l| l.catalog_item_id == catalog_item_id)
        .map(LineItem::key);

    match (matches.next(), matches.next()) {
        (Some(key), None) => Ok(key),
        (None, _) => Err(ApuError::NotFound {
            entity_type: "Line item",
            identifier: catalog_item_id.to_string(),
        }),
        (Some(_), Some(_)) => Err(ApuError::Validation(format!(
            "Catalog item {} appears under several categories; pass --category",
            catalog_item_id
        ))),
    }
}

/// Apply a line update, returning the line's new total
pub fn apply_update(worksheet: &mut Worksheet, key: LineKey, update: &LineUpdate) -> ApuResult<Decimal> {
    if let Some(text) = &update.quantity {
        worksheet.set_quantity(key, parse_decimal(text))?;
    }
    if let Some(text) = &update.waste {
        worksheet.set_waste(key, parse_decimal(text))?;
    }
    if let Some(text) = &update.performance {
        worksheet.set_performance(key, parse_decimal(text))?;
    }
    if let Some(identifier) = &update.section {
        let section_id = worksheet
            .find_section(identifier)
            .map(|s| s.id)
            .ok_or_else(|| ApuError::MissingTargetSection(identifier.clone()))?;
        worksheet.move_line_to_section(key, section_id)?;
    }

    Ok(worksheet.line(key).map(LineItem::total).unwrap_or(Decimal::ZERO))
}
