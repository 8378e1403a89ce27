//! Custom error types for APU-CLI
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.
//!
//! Numeric degradation (an unparsable quantity, a zero performance divisor)
//! is never an error here: the pricing core coerces such inputs to their
//! documented defaults instead.

use thiserror::Error;

use crate::models::ResourceCategory;

/// The main error type for APU-CLI operations
#[derive(Error, Debug)]
pub enum ApuError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Required-field validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A line for the same catalog item and category is already present
    #[error("Line item already present: catalog item {catalog_item_id} ({category})")]
    DuplicateLineItem {
        catalog_item_id: u64,
        category: ResourceCategory,
    },

    /// A line was attached to a section that does not exist
    #[error("Section not found in worksheet: {0}")]
    MissingTargetSection(String),

    /// The default section cannot be deleted
    #[error("Section cannot be removed: {0}")]
    ProtectedSection(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl ApuError {
    /// Create a "not found" error for catalog items
    pub fn catalog_item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Catalog item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for analyses
    pub fn analysis_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Analysis",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for clients
    pub fn client_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Client",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for projects
    pub fn project_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Project",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for line items inside a worksheet
    pub fn line_item_not_found(catalog_item_id: u64, category: ResourceCategory) -> Self {
        Self::NotFound {
            entity_type: "Line item",
            identifier: format!("{} ({})", catalog_item_id, category),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a duplicate line item rejection
    pub fn is_duplicate_line(&self) -> bool {
        matches!(self, Self::DuplicateLineItem { .. })
    }
}

impl From<std::io::Error> for ApuError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ApuError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for APU-CLI operations
pub type ApuResult<T> = Result<T, ApuError>;
