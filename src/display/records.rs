//! List and detail views for clients, projects, analyses and budgets

use tabled::{builder::Builder, settings::Style};

use crate::error::ApuResult;
use crate::models::{Analysis, Budget, Client, Project};

use super::money::MoneyFormat;
use super::worksheet::{format_lines_by_category, format_lines_by_section, format_summary};

/// Format clients as a table
pub fn format_client_list(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "No clients found.".to_string();
    }

    let mut table = Builder::default();
    table.push_record(["ID", "Name", "Tax ID", "Email", "Phone"]);
    for client in clients {
        table.push_record([
            client.id.to_string(),
            client.name.clone(),
            client.tax_id.clone().unwrap_or_default(),
            client.email.clone().unwrap_or_default(),
            client.phone.clone().unwrap_or_default(),
        ]);
    }
    table.build().with(Style::rounded()).to_string()
}

/// Format projects as a table, resolving client names through `client_name`
pub fn format_project_list<F>(projects: &[Project], client_name: F) -> String
where
    F: Fn(&Project) -> Option<String>,
{
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    let mut table = Builder::default();
    table.push_record(["ID", "Name", "Client", "Location", "Status"]);
    for project in projects {
        table.push_record([
            project.id.to_string(),
            project.name.clone(),
            client_name(project).unwrap_or_default(),
            project.location.clone().unwrap_or_default(),
            project.status.to_string(),
        ]);
    }
    table.build().with(Style::rounded()).to_string()
}

/// Format analyses with their unit prices
pub fn format_analysis_list(analyses: &[Analysis], money: &MoneyFormat) -> String {
    if analyses.is_empty() {
        return "No analyses found.".to_string();
    }

    let mut table = Builder::default();
    table.push_record(["ID", "Code", "Description", "Unit", "Lines", "Unit price"]);
    for analysis in analyses {
        table.push_record([
            analysis.id.to_string(),
            analysis.code.clone().unwrap_or_default(),
            analysis.description.clone(),
            analysis.unit.clone(),
            analysis.worksheet.lines().len().to_string(),
            money.amount(analysis.unit_price()),
        ]);
    }
    table.build().with(Style::rounded()).to_string()
}

/// Full view of one analysis
pub fn format_analysis_details(analysis: &Analysis, money: &MoneyFormat) -> String {
    let mut output = format!("Analysis {}: {}\n", analysis.id, analysis);
    output.push_str(&format_lines_by_category(&analysis.worksheet, money));
    output.push('\n');
    output.push_str(&format_summary(&analysis.worksheet, money));
    output.push_str(&format!(
        "\nUnit price: {} per {}\n",
        money.amount(analysis.unit_price()),
        analysis.unit
    ));
    output
}

/// Format budgets with their totals
pub fn format_budget_list(budgets: &[Budget], money: &MoneyFormat) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let mut table = Builder::default();
    table.push_record(["ID", "Name", "Sections", "Lines", "Direct", "Total"]);
    for budget in budgets {
        table.push_record([
            budget.id.to_string(),
            budget.name.clone(),
            budget.worksheet.sections().len().to_string(),
            budget.worksheet.lines().len().to_string(),
            money.amount(budget.worksheet.direct_total()),
            money.amount(budget.worksheet.grand_total()),
        ]);
    }
    table.build().with(Style::rounded()).to_string()
}

/// Full view of one budget, grouped by section or by category
pub fn format_budget_details(
    budget: &Budget,
    money: &MoneyFormat,
    by_category: bool,
) -> ApuResult<String> {
    let mut output = format!("Budget {}: {}\n", budget.id, budget.name);
    if by_category {
        output.push_str(&format_lines_by_category(&budget.worksheet, money));
    } else {
        output.push_str(&format_lines_by_section(&budget.worksheet, money)?);
    }
    output.push('\n');
    output.push_str(&format_summary(&budget.worksheet, money));
    output.push('\n');
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, DefaultIndirectCost, LineItem, ResourceCategory, DEFAULT_SECTION_NAME};
    use rust_decimal::Decimal;

    #[test]
    fn test_client_and_project_lists() {
        let client = Client::new("Acme");
        let project = Project::new("Bridge").for_client(client.id);

        assert!(format_client_list(&[client.clone()]).contains("Acme"));
        let output = format_project_list(&[project], |_| Some(client.name.clone()));
        assert!(output.contains("Bridge"));
        assert!(output.contains("Acme"));
        assert!(output.contains("Planning"));
        assert_eq!(format_project_list(&[], |_| None), "No projects found.");
    }

    #[test]
    fn test_analysis_details() {
        let mut analysis = Analysis::new("Plaster", "m2").with_code("04.01");
        let mortar = CatalogItem::new(3, "Mortar", "m3", Decimal::from(80), ResourceCategory::Materials);
        analysis
            .worksheet
            .add_line(LineItem::from_catalog(&mortar).with_quantity(Decimal::new(5, 1)))
            .unwrap();

        let output = format_analysis_details(&analysis, &MoneyFormat::default());
        assert!(output.contains("04.01 Plaster (m2)"));
        assert!(output.contains("Unit price: $40.00 per m2"));
    }

    #[test]
    fn test_budget_views() {
        let rules = DefaultIndirectCost::all().iter().map(|r| r.to_rule()).collect();
        let mut budget = Budget::new("Warehouse", DEFAULT_SECTION_NAME, rules);
        let truck = CatalogItem::new(9, "Truck", "trip", Decimal::from(100), ResourceCategory::Transport);
        budget.worksheet.add_line(LineItem::from_catalog(&truck)).unwrap();
        budget.worksheet.add_section("Structure").unwrap();

        let money = MoneyFormat::default();
        let by_section = format_budget_details(&budget, &money, false).unwrap();
        assert!(by_section.contains("Preliminares"));
        assert!(by_section.contains("Structure"));
        assert!(by_section.contains("(empty)"));
        assert!(by_section.contains("$130.00"));

        let by_category = format_budget_details(&budget, &money, true).unwrap();
        assert!(by_category.contains("Transport"));

        assert!(format_budget_list(&[budget], &money).contains("Warehouse"));
    }
}
