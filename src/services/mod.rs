//! Service layer for APU-CLI
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, catalog change propagation, worksheet persistence and audit
//! logging.

pub mod analysis;
pub mod budget;
pub mod catalog;
pub mod client;
pub mod lines;
pub mod persist;
pub mod project;

pub use analysis::AnalysisService;
pub use budget::BudgetService;
pub use catalog::{CatalogItemUpdate, CatalogService, PropagationReport};
pub use client::{ClientDetails, ClientService};
pub use lines::LineUpdate;
pub use project::ProjectService;
