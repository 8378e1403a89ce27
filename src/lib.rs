//! APU-CLI - Unit-price analysis and construction budgeting
//!
//! This library provides the core functionality for the APU-CLI application:
//! pricing resource lines from a supply catalog, composing them into
//! unit-price analyses (APUs), and rolling them up into sectioned project
//! budgets with indirect-cost markups.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (catalog items, lines, budgets, etc.)
//! - `pricing`: Line pricing, budget roll-up and the editable worksheet
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML budget export
//! - `cli`: Command handlers for the `apu` binary
//!
//! # Example
//!
//! ```rust
//! use apu::models::ResourceCategory;
//! use apu::pricing::price_raw;
//! use rust_decimal::Decimal;
//!
//! // 10 bags at 100 with 5% waste
//! let total = price_raw(
//!     Decimal::from(100),
//!     Some(Decimal::from(10)),
//!     ResourceCategory::Materials,
//!     Some(Decimal::from(5)),
//!     None,
//! );
//! assert_eq!(total, Decimal::from(1050));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod pricing;
pub mod services;
pub mod storage;

pub use error::ApuError;
