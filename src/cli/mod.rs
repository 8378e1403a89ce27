//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod analysis;
pub mod budget;
pub mod catalog;
pub mod client;
pub mod export;
pub mod lines;
pub mod price;
pub mod project;

pub use analysis::{handle_analysis_command, AnalysisCommands};
pub use budget::{handle_budget_command, BudgetCommands, IndirectCommands, SectionCommands};
pub use catalog::{handle_catalog_command, CatalogCommands};
pub use client::{handle_client_command, ClientCommands};
pub use export::{handle_export_command, ExportCommands, ExportFormat};
pub use price::{handle_price_command, PriceArgs};
pub use project::{handle_project_command, ProjectCommands};
