//! Configuration module for APU-CLI
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Default indirect costs and section naming

pub mod paths;
pub mod settings;

pub use paths::ApuPaths;
pub use settings::Settings;
