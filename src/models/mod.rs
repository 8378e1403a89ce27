//! Core data models for APU-CLI
//!
//! This module contains the data structures of the construction budgeting
//! domain: catalog items, line items, indirect costs, sections, analyses,
//! budgets, clients and projects.

pub mod analysis;
pub mod budget;
pub mod catalog;
pub mod client;
pub mod ids;
pub mod indirect;
pub mod line_item;
pub mod numeric;
pub mod project;
pub mod section;

pub use analysis::Analysis;
pub use budget::Budget;
pub use catalog::{CatalogItem, CatalogValidationError, ResourceCategory};
pub use client::Client;
pub use ids::{AnalysisId, BudgetId, ClientId, ProjectId, SectionId};
pub use indirect::{DefaultIndirectCost, IndirectCostRule};
pub use line_item::{Adjustment, LineItem, LineKey};
pub use project::{Project, ProjectStatus};
pub use section::{Section, DEFAULT_SECTION_NAME};
