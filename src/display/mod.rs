//! Display formatting for terminal output
//!
//! Formatting functions return strings; the CLI decides where they go.

pub mod catalog;
pub mod money;
pub mod records;
pub mod worksheet;

pub use catalog::{format_catalog_details, format_catalog_list};
pub use money::{format_percent, MoneyFormat};
pub use records::{
    format_analysis_details, format_analysis_list, format_budget_details, format_budget_list,
    format_client_list, format_project_list,
};
pub use worksheet::{format_lines_by_category, format_lines_by_section, format_summary};
