//! Catalog display formatting

use tabled::{builder::Builder, settings::Style};

use crate::models::CatalogItem;

use super::money::MoneyFormat;

/// Format catalog items as a table
pub fn format_catalog_list(items: &[CatalogItem], money: &MoneyFormat) -> String {
    if items.is_empty() {
        return "No catalog items found.".to_string();
    }

    let mut table = Builder::default();
    table.push_record(["ID", "Name", "Unit", "Unit price", "Category", "Supplier"]);
    for item in items {
        table.push_record([
            item.id.to_string(),
            item.name.clone(),
            item.unit.clone(),
            money.amount(item.unit_price),
            item.category.label().to_string(),
            item.supplier_type.clone().unwrap_or_default(),
        ]);
    }

    table.build().with(Style::rounded()).to_string()
}

/// Format one catalog item
pub fn format_catalog_details(item: &CatalogItem, money: &MoneyFormat) -> String {
    let mut output = format!("Catalog item #{}\n", item.id);
    output.push_str(&format!("  Name:       {}\n", item.name));
    output.push_str(&format!("  Unit:       {}\n", item.unit));
    output.push_str(&format!("  Unit price: {}\n", money.amount(item.unit_price)));
    output.push_str(&format!("  Category:   {}\n", item.category.label()));
    if let Some(supplier) = &item.supplier_type {
        output.push_str(&format!("  Supplier:   {}\n", supplier));
    }
    output.push_str(&format!(
        "  Updated:    {}\n",
        item.updated_at.format("%Y-%m-%d %H:%M")
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceCategory;
    use rust_decimal::Decimal;

    #[test]
    fn test_list_contains_rows() {
        let items = vec![
            CatalogItem::new(1, "Cement", "bag", Decimal::new(2850, 2), ResourceCategory::Materials),
            CatalogItem::new(2, "Laborer", "day", Decimal::from(70), ResourceCategory::Labor)
                .with_supplier_type("crew"),
        ];

        let output = format_catalog_list(&items, &MoneyFormat::default());
        assert!(output.contains("Cement"));
        assert!(output.contains("$28.50"));
        assert!(output.contains("crew"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(
            format_catalog_list(&[], &MoneyFormat::default()),
            "No catalog items found."
        );
    }

    #[test]
    fn test_details() {
        let item = CatalogItem::new(7, "Dump truck", "trip", Decimal::from(250), ResourceCategory::Transport);
        let output = format_catalog_details(&item, &MoneyFormat::default());
        assert!(output.starts_with("Catalog item #7"));
        assert!(output.contains("Unit price: $250.00"));
    }
}
