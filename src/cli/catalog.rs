//! Catalog CLI commands
//!
//! Implements CLI commands for supply catalog management.

use clap::Subcommand;
use rust_decimal::Decimal;

use crate::config::Settings;
use crate::display::{format_catalog_details, format_catalog_list, MoneyFormat};
use crate::error::{ApuError, ApuResult};
use crate::models::numeric::parse_decimal;
use crate::services::{CatalogItemUpdate, CatalogService};
use crate::storage::Storage;

use super::lines::{parse_category, parse_optional_category};

/// Catalog subcommands
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Add a catalog item
    Add {
        /// Item name
        name: String,
        /// Unit of measure (e.g., bag, m3, day)
        #[arg(short, long)]
        unit: String,
        /// Unit price (e.g., "28.50")
        #[arg(short, long)]
        price: String,
        /// Category (materials, equipment, labor, transport)
        #[arg(short, long)]
        category: String,
        /// Supplier type
        #[arg(short, long)]
        supplier: Option<String>,
    },
    /// List catalog items
    List {
        /// Only items of this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only items whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a catalog item
    Show {
        /// Item ID or name
        item: String,
    },
    /// Edit a catalog item
    Edit {
        /// Item ID or name
        item: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New unit
        #[arg(short, long)]
        unit: Option<String>,
        /// New unit price
        #[arg(short, long)]
        price: Option<String>,
        /// New supplier type (empty to clear)
        #[arg(short, long)]
        supplier: Option<String>,
        /// Re-price the lines of stored analyses and budgets that use this item
        #[arg(long)]
        propagate: bool,
    },
    /// Delete a catalog item (existing lines keep their prices)
    Delete {
        /// Item ID or name
        item: String,
    },
}

/// Handle a catalog command
pub fn handle_catalog_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CatalogCommands,
) -> ApuResult<()> {
    let service = CatalogService::new(storage);
    let money = MoneyFormat::from(settings);

    match cmd {
        CatalogCommands::Add {
            name,
            unit,
            price,
            category,
            supplier,
        } => {
            let category = parse_category(&category)?;
            let unit_price = parse_price(&price)?;

            let event = service.create(&name, &unit, unit_price, category, supplier.as_deref())?;
            if let Some(item) = event.item() {
                println!("Created catalog item #{}: {}", item.id, item.name);
                println!("  Unit price: {} per {}", money.amount(item.unit_price), item.unit);
                println!("  Category:   {}", item.category.label());
            }
        }

        CatalogCommands::List { category, search } => {
            let category = parse_optional_category(category.as_deref())?;
            let mut items = match &search {
                Some(query) => service.search(query)?,
                None => service.list(category)?,
            };
            if search.is_some() {
                if let Some(category) = category {
                    items.retain(|item| item.category == category);
                }
            }
            println!("{}", format_catalog_list(&items, &money));
        }

        CatalogCommands::Show { item } => {
            let found = service
                .find(&item)?
                .ok_or_else(|| ApuError::catalog_item_not_found(&item))?;
            print!("{}", format_catalog_details(&found, &money));
        }

        CatalogCommands::Edit {
            item,
            name,
            unit,
            price,
            supplier,
            propagate,
        } => {
            let found = service
                .find(&item)?
                .ok_or_else(|| ApuError::catalog_item_not_found(&item))?;

            let changes = CatalogItemUpdate {
                name,
                unit,
                unit_price: price.as_deref().map(parse_price).transpose()?,
                supplier_type: supplier,
            };
            if changes.name.is_none()
                && changes.unit.is_none()
                && changes.unit_price.is_none()
                && changes.supplier_type.is_none()
            {
                println!("No changes specified. Use --name, --unit, --price or --supplier.");
                return Ok(());
            }

            let event = service.update(found.id, changes)?;
            if let Some(updated) = event.item() {
                println!("Updated catalog item #{}: {}", updated.id, updated.name);
                if updated.unit_price != found.unit_price {
                    println!(
                        "  Unit price: {} -> {}",
                        money.amount(found.unit_price),
                        money.amount(updated.unit_price)
                    );
                }
            }

            if propagate {
                let report = service.propagate(&[event])?;
                println!(
                    "Re-priced {} line(s) in {} analysis(es) and {} budget(s)",
                    report.lines, report.analyses, report.budgets
                );
            }
        }

        CatalogCommands::Delete { item } => {
            let found = service
                .find(&item)?
                .ok_or_else(|| ApuError::catalog_item_not_found(&item))?;
            service.delete(found.id)?;
            println!("Deleted catalog item #{}: {}", found.id, found.name);
        }
    }

    Ok(())
}

/// Catalog prices must be numbers; unlike line inputs they are not coerced
fn parse_price(text: &str) -> ApuResult<Decimal> {
    parse_decimal(text).ok_or_else(|| {
        ApuError::Validation(format!(
            "Invalid price format: '{}'. Use format like '28.50' or '28'",
            text
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("28.50").unwrap(), Decimal::new(2850, 2));
        assert!(parse_price("cheap").unwrap_err().is_validation());
        assert!(parse_price("-$-5").unwrap_err().is_validation());
    }
}
