//! Budget CLI commands
//!
//! Implements CLI commands for project budgets: lines, sections and
//! indirect costs.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_budget_details, format_budget_list, format_percent, MoneyFormat};
use crate::error::{ApuError, ApuResult};
use crate::models::{Budget, ProjectId};
use crate::services::{BudgetService, ProjectService};
use crate::storage::Storage;

use super::lines::{parse_line_id, parse_optional_category, resolve_catalog_id, LineFields};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget with the default section and indirect costs
    Create {
        /// Budget name
        name: String,
        /// Project name or ID
        #[arg(short, long)]
        project: Option<String>,
    },
    /// List budgets with their totals
    List {
        /// Only budgets of this project
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Show a budget
    Show {
        /// Budget name or ID
        budget: String,
        /// Group lines by resource category instead of by section
        #[arg(long)]
        by_category: bool,
    },
    /// Add a line from the catalog
    AddItem {
        /// Budget name or ID
        budget: String,
        /// Catalog item ID or name
        item: String,
        /// Quantity
        #[arg(short, long, allow_hyphen_values = true)]
        quantity: Option<String>,
        /// Section name or ID (defaults to the first section)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Change a line's quantity, factors or section
    Set {
        /// Budget name or ID
        budget: String,
        /// Catalog item ID of the line
        item: String,
        /// Line category, when the item appears under several
        #[arg(short, long)]
        category: Option<String>,
        #[command(flatten)]
        fields: LineFields,
        /// Move the line to this section
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Remove a line
    RemoveItem {
        /// Budget name or ID
        budget: String,
        /// Catalog item ID of the line
        item: String,
        /// Line category, when the item appears under several
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Manage indirect costs
    #[command(subcommand)]
    Indirect(IndirectCommands),
    /// Manage sections
    #[command(subcommand)]
    Section(SectionCommands),
    /// Delete a budget
    Delete {
        /// Budget name or ID
        budget: String,
    },
}

/// Indirect cost subcommands
#[derive(Subcommand)]
pub enum IndirectCommands {
    /// Set an indirect cost percentage
    Set {
        /// Budget name or ID
        budget: String,
        /// Rule ID (e.g., administration, contingency, profit)
        rule: String,
        /// Percentage of the direct cost
        #[arg(allow_hyphen_values = true)]
        percentage: String,
    },
    /// Add an indirect cost
    Add {
        /// Budget name or ID
        budget: String,
        /// Rule ID
        rule: String,
        /// Display name
        name: String,
        /// Percentage of the direct cost
        #[arg(allow_hyphen_values = true)]
        percentage: String,
    },
    /// Remove an indirect cost
    Remove {
        /// Budget name or ID
        budget: String,
        /// Rule ID
        rule: String,
    },
}

/// Section subcommands
#[derive(Subcommand)]
pub enum SectionCommands {
    /// Append a section
    Add {
        /// Budget name or ID
        budget: String,
        /// Section name
        name: String,
    },
    /// Rename a section
    Rename {
        /// Budget name or ID
        budget: String,
        /// Section name or ID
        section: String,
        /// New name
        name: String,
    },
    /// Remove a section, moving its lines to the first section
    Remove {
        /// Budget name or ID
        budget: String,
        /// Section name or ID
        section: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> ApuResult<()> {
    let service = BudgetService::new(storage);
    let money = MoneyFormat::from(settings);

    match cmd {
        BudgetCommands::Create { name, project } => {
            let project_id = project
                .as_deref()
                .map(|p| find_project(storage, p))
                .transpose()?;
            let budget = service.create(&name, project_id)?;
            println!("Created budget: {}", budget.name);
            println!("  ID: {}", budget.id);
            for rule in budget.worksheet.indirect_costs() {
                println!("  {}: {}", rule.name, format_percent(rule.percentage));
            }
        }

        BudgetCommands::List { project } => {
            let project_id = project
                .as_deref()
                .map(|p| find_project(storage, p))
                .transpose()?;
            let budgets = service.list(project_id)?;
            println!("{}", format_budget_list(&budgets, &money));
        }

        BudgetCommands::Show {
            budget,
            by_category,
        } => {
            let found = find(&service, &budget)?;
            print!("{}", format_budget_details(&found, &money, by_category)?);
        }

        BudgetCommands::AddItem {
            budget,
            item,
            quantity,
            section,
        } => {
            let found = find(&service, &budget)?;
            let catalog_item_id = resolve_catalog_id(storage, &item)?;
            let updated = service.add_item(
                found.id,
                catalog_item_id,
                quantity.as_deref(),
                section.as_deref(),
            )?;
            if let Some(line) = updated.worksheet.lines().last() {
                println!("Added {} to {}", line.name, updated.name);
                println!("  Line total: {}", money.amount(line.total()));
            }
            print_totals(&updated, &money);
        }

        BudgetCommands::Set {
            budget,
            item,
            category,
            fields,
            section,
        } => {
            let found = find(&service, &budget)?;
            let catalog_item_id = parse_line_id(&item)?;
            let category = parse_optional_category(category.as_deref())?;
            let update = fields.into_update(section);
            if update.is_empty() {
                println!(
                    "No changes specified. Use --quantity, --waste, --performance or --section."
                );
                return Ok(());
            }

            let (updated, total) =
                service.update_item(found.id, catalog_item_id, category, &update)?;
            println!("Updated line #{} of {}", catalog_item_id, updated.name);
            println!("  Line total: {}", money.amount(total));
            print_totals(&updated, &money);
        }

        BudgetCommands::RemoveItem {
            budget,
            item,
            category,
        } => {
            let found = find(&service, &budget)?;
            let catalog_item_id = parse_line_id(&item)?;
            let category = parse_optional_category(category.as_deref())?;
            let (updated, line) = service.remove_item(found.id, catalog_item_id, category)?;
            println!("Removed {} from {}", line.name, updated.name);
            print_totals(&updated, &money);
        }

        BudgetCommands::Indirect(cmd) => handle_indirect_command(&service, &money, cmd)?,

        BudgetCommands::Section(cmd) => handle_section_command(&service, cmd)?,

        BudgetCommands::Delete { budget } => {
            let found = find(&service, &budget)?;
            service.delete(found.id)?;
            println!("Deleted budget: {}", found.name);
        }
    }

    Ok(())
}

fn handle_indirect_command(
    service: &BudgetService,
    money: &MoneyFormat,
    cmd: IndirectCommands,
) -> ApuResult<()> {
    match cmd {
        IndirectCommands::Set {
            budget,
            rule,
            percentage,
        } => {
            let found = find(service, &budget)?;
            let (updated, amount) = service.set_indirect(found.id, &rule, &percentage)?;
            println!("Set {} on {}: {}", rule, updated.name, money.amount(amount));
            print_totals(&updated, money);
        }

        IndirectCommands::Add {
            budget,
            rule,
            name,
            percentage,
        } => {
            let found = find(service, &budget)?;
            let updated = service.add_indirect(found.id, &rule, &name, &percentage)?;
            println!("Added indirect cost {} to {}", name.trim(), updated.name);
            print_totals(&updated, money);
        }

        IndirectCommands::Remove { budget, rule } => {
            let found = find(service, &budget)?;
            let updated = service.remove_indirect(found.id, &rule)?;
            println!("Removed indirect cost {} from {}", rule, updated.name);
            print_totals(&updated, money);
        }
    }

    Ok(())
}

fn handle_section_command(service: &BudgetService, cmd: SectionCommands) -> ApuResult<()> {
    match cmd {
        SectionCommands::Add { budget, name } => {
            let found = find(service, &budget)?;
            let (updated, section_id) = service.add_section(found.id, &name)?;
            println!("Added section {} to {}", name.trim(), updated.name);
            println!("  ID: {}", section_id);
        }

        SectionCommands::Rename {
            budget,
            section,
            name,
        } => {
            let found = find(service, &budget)?;
            let updated = service.rename_section(found.id, &section, &name)?;
            println!("Renamed section {} to {} in {}", section, name.trim(), updated.name);
        }

        SectionCommands::Remove { budget, section } => {
            let found = find(service, &budget)?;
            let (updated, moved) = service.remove_section(found.id, &section)?;
            println!("Removed section {} from {}", section, updated.name);
            if moved > 0 {
                println!("  Moved {} line(s) to the first section", moved);
            }
        }
    }

    Ok(())
}

fn print_totals(budget: &Budget, money: &MoneyFormat) {
    let aggregate = budget.worksheet.aggregate();
    println!("  Direct cost: {}", money.amount(aggregate.direct_total));
    println!("  Grand total: {}", money.amount(aggregate.grand_total));
}

fn find(service: &BudgetService, identifier: &str) -> ApuResult<Budget> {
    service
        .find(identifier)?
        .ok_or_else(|| ApuError::budget_not_found(identifier))
}

fn find_project(storage: &Storage, identifier: &str) -> ApuResult<ProjectId> {
    ProjectService::new(storage)
        .find(identifier)?
        .map(|p| p.id)
        .ok_or_else(|| ApuError::project_not_found(identifier))
}
