//! Project budget model
//!
//! A budget is a sectioned collection of priced lines with indirect cost
//! markups, usually attached to a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, ProjectId};
use super::indirect::IndirectCostRule;
use crate::pricing::Worksheet;

/// A composite project budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Budget name
    pub name: String,

    /// Project this budget belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,

    /// Sections, lines and indirect costs
    pub worksheet: Worksheet,

    /// When the budget was created
    pub created_at: DateTime<Utc>,

    /// When the budget was last modified
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget seeded with the given indirect costs
    pub fn new(
        name: impl Into<String>,
        default_section_name: &str,
        indirect_costs: Vec<IndirectCostRule>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            name: name.into(),
            project_id: None,
            worksheet: Worksheet::new(default_section_name).with_indirect_costs(indirect_costs),
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the budget to a project
    pub fn for_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Budget name cannot be empty".into());
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DefaultIndirectCost, DEFAULT_SECTION_NAME};

    #[test]
    fn test_new_budget_seeded() {
        let rules = DefaultIndirectCost::all().iter().map(|r| r.to_rule()).collect();
        let budget = Budget::new("Warehouse", DEFAULT_SECTION_NAME, rules);
        assert_eq!(budget.worksheet.indirect_costs().len(), 3);
        assert_eq!(budget.worksheet.sections()[0].name, "Preliminares");
        assert!(budget.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let budget = Budget::new("  ", DEFAULT_SECTION_NAME, Vec::new());
        assert!(budget.validate().is_err());
    }
}
