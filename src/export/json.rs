//! JSON Export functionality
//!
//! Exports a budget as a self-contained document: the budget itself (with
//! its worksheet totals), the project and client it belongs to, and the
//! category and section subtotals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

use crate::error::{ApuError, ApuResult};
use crate::models::Budget;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Budget export structure
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Name of the project the budget belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Name of the project's client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// The budget, including sections, lines and the roll-up totals
    pub budget: Budget,

    /// Subtotals for reference
    pub summary: ExportSummary,
}

/// Grouped subtotals of the exported budget
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub line_count: usize,
    pub by_category: Vec<GroupSubtotal>,
    pub by_section: Vec<GroupSubtotal>,
    pub direct_total: Decimal,
    pub indirect_total: Decimal,
    pub grand_total: Decimal,
}

/// One group's subtotal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSubtotal {
    pub name: String,
    pub line_count: usize,
    pub subtotal: Decimal,
}

impl BudgetExport {
    /// Build the export document for a stored budget
    pub fn from_budget(storage: &Storage, budget: &Budget) -> ApuResult<Self> {
        let project = match budget.project_id {
            Some(id) => storage.projects.get(id)?,
            None => None,
        };
        let client = match project.as_ref().and_then(|p| p.client_id) {
            Some(id) => storage.clients.get(id)?,
            None => None,
        };

        let worksheet = &budget.worksheet;
        let by_category = worksheet
            .by_category()
            .into_iter()
            .map(|g| GroupSubtotal {
                name: g.category.label().to_string(),
                line_count: g.items.len(),
                subtotal: g.subtotal,
            })
            .collect();
        let by_section = worksheet
            .by_section()?
            .into_iter()
            .map(|g| GroupSubtotal {
                name: g.section.name.clone(),
                line_count: g.items.len(),
                subtotal: g.subtotal,
            })
            .collect();

        let aggregate = worksheet.aggregate();
        let summary = ExportSummary {
            line_count: worksheet.lines().len(),
            by_category,
            by_section,
            direct_total: aggregate.direct_total,
            indirect_total: aggregate.indirect_total,
            grand_total: aggregate.grand_total,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            project: project.map(|p| p.name),
            client: client.map(|c| c.name),
            budget: budget.clone(),
            summary,
        })
    }
}

/// Export a budget to JSON format
pub fn export_budget_json<W: Write>(
    storage: &Storage,
    budget: &Budget,
    writer: &mut W,
    pretty: bool,
) -> ApuResult<()> {
    let export = BudgetExport::from_budget(storage, budget)?;

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| ApuError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| ApuError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ApuPaths;
    use crate::models::ResourceCategory;
    use crate::services::{BudgetService, CatalogService, ClientDetails, ClientService, ProjectService};
    use tempfile::TempDir;

    fn decimal_at(value: &serde_json::Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ApuPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn sample_budget(storage: &Storage) -> Budget {
        let client = ClientService::new(storage)
            .create("Acme Builders", ClientDetails::default())
            .unwrap();
        let project = ProjectService::new(storage)
            .create("Warehouse", Some(client.id), None)
            .unwrap();
        CatalogService::new(storage)
            .create("Cement", "bag", Decimal::from(100), ResourceCategory::Materials, None)
            .unwrap();

        let service = BudgetService::new(storage);
        let budget = service.create("Phase 1", Some(project.id)).unwrap();
        service.add_item(budget.id, 1, Some("10"), None).unwrap()
    }

    #[test]
    fn test_export_document() {
        let (_temp_dir, storage) = create_test_storage();
        let budget = sample_budget(&storage);

        let export = BudgetExport::from_budget(&storage, &budget).unwrap();
        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.project.as_deref(), Some("Warehouse"));
        assert_eq!(export.client.as_deref(), Some("Acme Builders"));
        assert_eq!(export.summary.line_count, 1);
        assert_eq!(export.summary.direct_total, Decimal::from(1000));
        // 10% + 5% + 15% of 1000
        assert_eq!(export.summary.indirect_total, Decimal::from(300));
        assert_eq!(export.summary.grand_total, Decimal::from(1300));
        assert_eq!(export.summary.by_category.len(), 1);
        assert_eq!(export.summary.by_section[0].name, "Preliminares");
    }

    #[test]
    fn test_export_json() {
        let (_temp_dir, storage) = create_test_storage();
        let budget = sample_budget(&storage);

        let mut output = Vec::new();
        export_budget_json(&storage, &budget, &mut output, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["schemaVersion"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["budget"]["name"], "Phase 1");
        assert_eq!(decimal_at(&value["summary"]["grandTotal"]), Decimal::from(1300));
        assert_eq!(
            decimal_at(&value["budget"]["worksheet"]["lines"][0]["total"]),
            Decimal::from(1000)
        );
    }
}
