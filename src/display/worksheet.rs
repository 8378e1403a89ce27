//! Worksheet display formatting
//!
//! Line tables grouped by category or by section, followed by the roll-up.

use tabled::{builder::Builder, settings::Style};

use crate::error::ApuResult;
use crate::models::{Adjustment, LineItem};
use crate::pricing::Worksheet;

use super::money::{format_percent, MoneyFormat};

/// Lines grouped by resource category
pub fn format_lines_by_category(worksheet: &Worksheet, money: &MoneyFormat) -> String {
    let groups = worksheet.by_category();
    if groups.is_empty() {
        return "No line items.\n".to_string();
    }

    let mut output = String::new();
    for group in groups {
        output.push_str(&format!("\n{}\n", group.category.label()));
        output.push_str(&line_table(&group.items, money));
        output.push_str(&format!("\n  Subtotal: {}\n", money.amount(group.subtotal)));
    }
    output
}

/// Lines grouped by section, every section shown
pub fn format_lines_by_section(worksheet: &Worksheet, money: &MoneyFormat) -> ApuResult<String> {
    let mut output = String::new();
    for group in worksheet.by_section()? {
        output.push_str(&format!("\n{}\n", group.section.name));
        if group.items.is_empty() {
            output.push_str("  (empty)\n");
            continue;
        }
        output.push_str(&line_table(&group.items, money));
        output.push_str(&format!("\n  Subtotal: {}\n", money.amount(group.subtotal)));
    }
    Ok(output)
}

/// Direct total, indirect costs and grand total
pub fn format_summary(worksheet: &Worksheet, money: &MoneyFormat) -> String {
    let aggregate = worksheet.aggregate();

    let mut table = Builder::default();
    table.push_record(["Direct cost".to_string(), money.amount(aggregate.direct_total)]);
    for rule in &aggregate.indirect_costs {
        table.push_record([
            format!("  {} ({})", rule.name, format_percent(rule.percentage)),
            money.amount(rule.amount),
        ]);
    }
    if !aggregate.indirect_costs.is_empty() {
        table.push_record(["Indirect cost".to_string(), money.amount(aggregate.indirect_total)]);
    }
    table.push_record(["Total".to_string(), money.amount(aggregate.grand_total)]);

    table.build().with(Style::blank()).to_string()
}

fn line_table(lines: &[&LineItem], money: &MoneyFormat) -> String {
    let mut table = Builder::default();
    table.push_record(["ID", "Resource", "Unit", "Quantity", "Unit price", "Factor", "Total"]);
    for line in lines {
        table.push_record([
            line.catalog_item_id.to_string(),
            line.name.clone(),
            line.unit.clone(),
            money.number(line.quantity),
            money.amount(line.unit_price),
            factor(line.adjustment()),
            money.amount(line.total()),
        ]);
    }
    table.build().with(Style::rounded()).to_string()
}

fn factor(adjustment: &Adjustment) -> String {
    match adjustment {
        Adjustment::Materials { waste_percentage } => {
            format!("waste {}", format_percent(*waste_percentage))
        }
        Adjustment::Equipment { performance } | Adjustment::Labor { performance } => {
            format!("perf {}", performance.normalize())
        }
        Adjustment::Transport => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, IndirectCostRule, ResourceCategory};
    use rust_decimal::Decimal;

    fn worksheet() -> Worksheet {
        let mut ws = Worksheet::default().with_indirect_costs(vec![IndirectCostRule::new(
            "profit",
            "Profit",
            Decimal::from(10),
        )]);
        let sand = CatalogItem::new(1, "Sand", "m3", Decimal::from(50), ResourceCategory::Materials);
        let crew = CatalogItem::new(2, "Crew", "day", Decimal::from(300), ResourceCategory::Labor);
        ws.add_line(LineItem::from_catalog(&sand).with_quantity(Decimal::from(2)))
            .unwrap();
        ws.add_line(LineItem::from_catalog(&crew)).unwrap();
        ws
    }

    #[test]
    fn test_by_category() {
        let output = format_lines_by_category(&worksheet(), &MoneyFormat::default());
        assert!(output.contains("Materials"));
        assert!(output.contains("Labor"));
        assert!(!output.contains("Transport"));
        assert!(output.contains("waste 0%"));
        assert!(output.contains("Subtotal: $100.00"));
    }

    #[test]
    fn test_by_section_shows_default_section() {
        let output = format_lines_by_section(&worksheet(), &MoneyFormat::default()).unwrap();
        assert!(output.contains("Preliminares"));
        assert!(output.contains("Subtotal: $400.00"));
    }

    #[test]
    fn test_summary() {
        let output = format_summary(&worksheet(), &MoneyFormat::default());
        assert!(output.contains("$400.00"));
        assert!(output.contains("Profit (10%)"));
        assert!(output.contains("$40.00"));
        assert!(output.contains("$440.00"));
    }

    #[test]
    fn test_empty_worksheet() {
        let output = format_lines_by_category(&Worksheet::default(), &MoneyFormat::default());
        assert_eq!(output, "No line items.\n");
    }
}
