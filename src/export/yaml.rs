//! YAML Export functionality
//!
//! Exports a budget document to YAML for human reading.

use std::io::Write;

use crate::error::{ApuError, ApuResult};
use crate::export::json::BudgetExport;
use crate::models::Budget;
use crate::storage::Storage;

/// Export a budget to YAML format
pub fn export_budget_yaml<W: Write>(
    storage: &Storage,
    budget: &Budget,
    writer: &mut W,
) -> ApuResult<()> {
    let export = BudgetExport::from_budget(storage, budget)?;

    // Header comment
    writeln!(writer, "# APU-CLI Budget Export: {}", export.budget.name)
        .map_err(|e| ApuError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| ApuError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| ApuError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| ApuError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| ApuError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ApuPaths;
    use crate::models::ResourceCategory;
    use crate::services::{BudgetService, CatalogService};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[test]
    fn test_export_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ApuPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        CatalogService::new(&storage)
            .create("Crew", "day", Decimal::from(400), ResourceCategory::Labor, None)
            .unwrap();
        let service = BudgetService::new(&storage);
        let budget = service.create("Fence", None).unwrap();
        let budget = service.add_item(budget.id, 1, Some("2"), None).unwrap();

        let mut output = Vec::new();
        export_budget_yaml(&storage, &budget, &mut output).unwrap();

        let yaml = String::from_utf8(output).unwrap();
        assert!(yaml.starts_with("# APU-CLI Budget Export: Fence"));
        assert!(yaml.contains("schemaVersion:"));
        assert!(yaml.contains("name: Crew"));
        assert!(yaml.contains("performanceDivisor:"));

        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let direct: Decimal = value["summary"]["directTotal"].as_str().unwrap().parse().unwrap();
        assert_eq!(direct, Decimal::from(800));
    }
}
