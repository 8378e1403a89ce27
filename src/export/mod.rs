//! Export module for APU-CLI
//!
//! Provides budget export in multiple formats:
//! - CSV: line items and summary rows (spreadsheet-compatible)
//! - JSON: the full budget document, machine-readable
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_budget_csv;
pub use json::{export_budget_json, BudgetExport, ExportSummary, GroupSubtotal, EXPORT_SCHEMA_VERSION};
pub use yaml::export_budget_yaml;
