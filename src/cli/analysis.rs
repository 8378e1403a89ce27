//! Analysis CLI commands
//!
//! Implements CLI commands for unit-price analyses (APUs).

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_analysis_details, format_analysis_list, MoneyFormat};
use crate::error::{ApuError, ApuResult};
use crate::models::Analysis;
use crate::services::AnalysisService;
use crate::storage::Storage;

use super::lines::{parse_line_id, parse_optional_category, resolve_catalog_id, LineFields};

/// Analysis subcommands
#[derive(Subcommand)]
pub enum AnalysisCommands {
    /// Create an empty analysis
    Create {
        /// Description of the unit of work
        description: String,
        /// Unit the analysis prices (e.g., m2, m3)
        #[arg(short, long)]
        unit: String,
        /// Item code (e.g., "02.01")
        #[arg(short, long)]
        code: Option<String>,
    },
    /// List analyses with their unit prices
    List,
    /// Show an analysis
    Show {
        /// Analysis code, description or ID
        analysis: String,
    },
    /// Add a resource line from the catalog
    AddItem {
        /// Analysis code, description or ID
        analysis: String,
        /// Catalog item ID or name
        item: String,
        /// Quantity consumed per unit of work
        #[arg(short, long, allow_hyphen_values = true)]
        quantity: Option<String>,
    },
    /// Change a line's quantity, waste or performance
    Set {
        /// Analysis code, description or ID
        analysis: String,
        /// Catalog item ID of the line
        item: String,
        /// Line category, when the item appears under several
        #[arg(short, long)]
        category: Option<String>,
        #[command(flatten)]
        fields: LineFields,
    },
    /// Remove a line
    RemoveItem {
        /// Analysis code, description or ID
        analysis: String,
        /// Catalog item ID of the line
        item: String,
        /// Line category, when the item appears under several
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete an analysis
    Delete {
        /// Analysis code, description or ID
        analysis: String,
    },
}

/// Handle an analysis command
pub fn handle_analysis_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AnalysisCommands,
) -> ApuResult<()> {
    let service = AnalysisService::new(storage);
    let money = MoneyFormat::from(settings);

    match cmd {
        AnalysisCommands::Create {
            description,
            unit,
            code,
        } => {
            let analysis = service.create(&description, &unit, code.as_deref())?;
            println!("Created analysis: {}", analysis);
            println!("  ID: {}", analysis.id);
        }

        AnalysisCommands::List => {
            let analyses = service.list()?;
            println!("{}", format_analysis_list(&analyses, &money));
        }

        AnalysisCommands::Show { analysis } => {
            let found = find(&service, &analysis)?;
            print!("{}", format_analysis_details(&found, &money));
        }

        AnalysisCommands::AddItem {
            analysis,
            item,
            quantity,
        } => {
            let found = find(&service, &analysis)?;
            let catalog_item_id = resolve_catalog_id(storage, &item)?;
            let updated = service.add_item(found.id, catalog_item_id, quantity.as_deref())?;
            if let Some(line) = updated.worksheet.lines().last() {
                println!("Added {} to {}", line.name, updated);
                println!("  Line total: {}", money.amount(line.total()));
            }
            println!("  Unit price: {}", money.amount(updated.unit_price()));
        }

        AnalysisCommands::Set {
            analysis,
            item,
            category,
            fields,
        } => {
            let found = find(&service, &analysis)?;
            let catalog_item_id = parse_line_id(&item)?;
            let category = parse_optional_category(category.as_deref())?;
            let update = fields.into_update(None);
            if update.is_empty() {
                println!("No changes specified. Use --quantity, --waste or --performance.");
                return Ok(());
            }

            let (updated, total) =
                service.update_item(found.id, catalog_item_id, category, &update)?;
            println!("Updated line #{} of {}", catalog_item_id, updated);
            println!("  Line total: {}", money.amount(total));
            println!("  Unit price: {}", money.amount(updated.unit_price()));
        }

        AnalysisCommands::RemoveItem {
            analysis,
            item,
            category,
        } => {
            let found = find(&service, &analysis)?;
            let catalog_item_id = parse_line_id(&item)?;
            let category = parse_optional_category(category.as_deref())?;
            let (updated, line) = service.remove_item(found.id, catalog_item_id, category)?;
            println!("Removed {} from {}", line.name, updated);
            println!("  Unit price: {}", money.amount(updated.unit_price()));
        }

        AnalysisCommands::Delete { analysis } => {
            let found = find(&service, &analysis)?;
            service.delete(found.id)?;
            println!("Deleted analysis: {}", found);
        }
    }

    Ok(())
}

fn find(service: &AnalysisService, identifier: &str) -> ApuResult<Analysis> {
    service
        .find(identifier)?
        .ok_or_else(|| ApuError::analysis_not_found(identifier))
}
