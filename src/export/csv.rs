//! CSV Export functionality
//!
//! Exports a budget's lines to CSV, grouped by section, followed by the
//! summary rows (category subtotals, direct cost, indirect costs and the
//! grand total).

use rust_decimal::Decimal;
use std::io::Write;

use crate::error::{ApuError, ApuResult};
use crate::models::{Budget, LineItem};

const HEADER: [&str; 10] = [
    "Section",
    "Category",
    "Catalog ID",
    "Resource",
    "Unit",
    "Quantity",
    "Unit Price",
    "Waste %",
    "Performance",
    "Total",
];

/// Export a budget to CSV
pub fn export_budget_csv<W: Write>(budget: &Budget, writer: &mut W) -> ApuResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let worksheet = &budget.worksheet;

    csv_writer
        .write_record(HEADER)
        .map_err(|e| ApuError::Export(e.to_string()))?;

    for group in worksheet.by_section()? {
        for line in &group.items {
            csv_writer
                .write_record(line_record(&group.section.name, line))
                .map_err(|e| ApuError::Export(e.to_string()))?;
        }
    }

    for group in worksheet.by_category() {
        let label = format!("{} subtotal", group.category.label());
        csv_writer
            .write_record(summary_record(&label, group.subtotal))
            .map_err(|e| ApuError::Export(e.to_string()))?;
    }

    let aggregate = worksheet.aggregate();
    csv_writer
        .write_record(summary_record("Direct cost", aggregate.direct_total))
        .map_err(|e| ApuError::Export(e.to_string()))?;
    for rule in &aggregate.indirect_costs {
        let label = format!("{} ({}%)", rule.name, number(rule.percentage));
        csv_writer
            .write_record(summary_record(&label, rule.amount))
            .map_err(|e| ApuError::Export(e.to_string()))?;
    }
    csv_writer
        .write_record(summary_record("Indirect cost", aggregate.indirect_total))
        .map_err(|e| ApuError::Export(e.to_string()))?;
    csv_writer
        .write_record(summary_record("Grand total", aggregate.grand_total))
        .map_err(|e| ApuError::Export(e.to_string()))?;

    csv_writer
        .flush()
        .map_err(|e| ApuError::Export(e.to_string()))?;

    Ok(())
}

fn line_record(section: &str, line: &LineItem) -> [String; 10] {
    [
        section.to_string(),
        line.category().as_str().to_string(),
        line.catalog_item_id.to_string(),
        line.name.clone(),
        line.unit.clone(),
        number(line.quantity),
        number(line.unit_price),
        line.waste_percentage().map(number).unwrap_or_default(),
        line.performance().map(number).unwrap_or_default(),
        number(line.total()),
    ]
}

fn summary_record(label: &str, amount: Decimal) -> [String; 10] {
    let mut record: [String; 10] = Default::default();
    record[0] = "Summary".to_string();
    record[3] = label.to_string();
    record[9] = number(amount);
    record
}

/// Full precision, without trailing zeros
fn number(value: Decimal) -> String {
    value.normalize().to_string()
}
