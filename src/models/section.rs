//! Budget sections
//!
//! Sections are named, ordered buckets that group budget lines independently
//! of their resource category. Every worksheet carries the default section,
//! which cannot be removed and absorbs the lines of removed sections.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SectionId;

/// Name of the default section
pub const DEFAULT_SECTION_NAME: &str = "Preliminares";

/// A named grouping bucket for budget lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier
    pub id: SectionId,

    /// Display name
    pub name: String,

    /// Sort order for display (ascending)
    pub order: i32,
}

impl Section {
    /// Create a new section
    pub fn new(name: impl Into<String>, order: i32) -> Self {
        Self {
            id: SectionId::new(),
            name: name.into(),
            order,
        }
    }

    /// The default section
    pub fn default_section(name: impl Into<String>) -> Self {
        Self {
            id: SectionId::default_section(),
            name: name.into(),
            order: 0,
        }
    }

    /// Whether this is the protected default section
    pub fn is_default(&self) -> bool {
        self.id.is_default_section()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_section() {
        let section = Section::default_section(DEFAULT_SECTION_NAME);
        assert!(section.is_default());
        assert_eq!(section.order, 0);
        assert_eq!(section.to_string(), "Preliminares");
    }

    #[test]
    fn test_new_section_is_not_default() {
        let section = Section::new("Structure", 1);
        assert!(!section.is_default());
    }
}
