//! Budget service
//!
//! Budgets are created with the default section and the indirect costs
//! configured in settings. Every edit loads the stored budget, applies the
//! change to its worksheet and saves it back.

use rust_decimal::Decimal;

use crate::config::Settings;
use crate::error::{ApuError, ApuResult};
use crate::models::numeric::parse_decimal;
use crate::models::{
    Budget, BudgetId, IndirectCostRule, LineItem, ProjectId, ResourceCategory, SectionId,
};
use crate::storage::Storage;

use super::lines::{apply_update, line_from_catalog, resolve_line, LineUpdate};
use super::persist::save_priced;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a budget seeded from settings
    pub fn create(&self, name: &str, project_id: Option<ProjectId>) -> ApuResult<Budget> {
        let name = name.trim();
        if self.storage.budgets.label_exists(name, None)? {
            return Err(ApuError::Duplicate {
                entity_type: "Budget",
                identifier: name.to_string(),
            });
        }

        let settings = Settings::load_or_create(self.storage.paths())?;
        let mut budget = Budget::new(
            name,
            &settings.default_section_name,
            settings.indirect_costs_for_new_budget(),
        );

        if let Some(project_id) = project_id {
            if self.storage.projects.get(project_id)?.is_none() {
                return Err(ApuError::project_not_found(project_id.to_string()));
            }
            budget = budget.for_project(project_id);
        }
        budget.validate().map_err(ApuError::Validation)?;

        self.save(&mut budget)?;
        Ok(budget)
    }

    /// Get a budget by ID
    pub fn get(&self, id: BudgetId) -> ApuResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Find a budget by name or ID (full or short form)
    pub fn find(&self, identifier: &str) -> ApuResult<Option<Budget>> {
        if let Some(budget) = self.storage.budgets.get_by_label(identifier)? {
            return Ok(Some(budget));
        }
        if let Ok(id) = identifier.parse::<BudgetId>() {
            return self.storage.budgets.get(id);
        }
        self.storage.budgets.find(|b| b.id.matches_prefix(identifier))
    }

    /// List budgets, optionally for one project
    pub fn list(&self, project_id: Option<ProjectId>) -> ApuResult<Vec<Budget>> {
        match project_id {
            Some(project_id) => self.storage.budgets.get_by_project(project_id),
            None => self.storage.budgets.get_all(),
        }
    }

    // === Lines ===

    /// Add a line priced from the catalog, optionally into a section
    pub fn add_item(
        &self,
        id: BudgetId,
        catalog_item_id: u64,
        quantity: Option<&str>,
        section: Option<&str>,
    ) -> ApuResult<Budget> {
        let mut budget = self.require(id)?;
        let line = line_from_catalog(self.storage, catalog_item_id, quantity)?;
        match section {
            Some(identifier) => {
                let section_id = section_id(&budget, identifier)?;
                budget.worksheet.add_line_to_section(line, section_id)?;
            }
            None => budget.worksheet.add_line(line)?,
        }
        self.save(&mut budget)?;
        Ok(budget)
    }

    /// Change a line's quantity, factors or section
    ///
    /// Returns the budget and the line's new total.
    pub fn update_item(
        &self,
        id: BudgetId,
        catalog_item_id: u64,
        category: Option<ResourceCategory>,
        update: &LineUpdate,
    ) -> ApuResult<(Budget, Decimal)> {
        let mut budget = self.require(id)?;
        let key = resolve_line(&budget.worksheet, catalog_item_id, category)?;
        let total = apply_update(&mut budget.worksheet, key, update)?;
        self.save(&mut budget)?;
        Ok((budget, total))
    }

    /// Remove a line
    pub fn remove_item(
        &self,
        id: BudgetId,
        catalog_item_id: u64,
        category: Option<ResourceCategory>,
    ) -> ApuResult<(Budget, LineItem)> {
        let mut budget = self.require(id)?;
        let key = resolve_line(&budget.worksheet, catalog_item_id, category)?;
        let line = budget.worksheet.remove_line(key)?;
        self.save(&mut budget)?;
        Ok((budget, line))
    }

    // === Indirect costs ===

    /// Change an indirect cost percentage; unusable text counts as zero
    ///
    /// Returns the budget and the rule's new amount.
    pub fn set_indirect(
        &self,
        id: BudgetId,
        rule_id: &str,
        percentage: &str,
    ) -> ApuResult<(Budget, Decimal)> {
        let mut budget = self.require(id)?;
        let amount = budget
            .worksheet
            .set_indirect_percentage(rule_id, parse_decimal(percentage))?;
        self.save(&mut budget)?;
        Ok((budget, amount))
    }

    /// Add an indirect cost rule
    pub fn add_indirect(
        &self,
        id: BudgetId,
        rule_id: &str,
        name: &str,
        percentage: &str,
    ) -> ApuResult<Budget> {
        let rule_id = rule_id.trim();
        if rule_id.is_empty() || name.trim().is_empty() {
            return Err(ApuError::Validation(
                "Indirect cost id and name cannot be empty".into(),
            ));
        }

        let mut budget = self.require(id)?;
        let percentage = parse_decimal(percentage).unwrap_or(Decimal::ZERO);
        budget
            .worksheet
            .add_indirect_rule(IndirectCostRule::new(rule_id, name.trim(), percentage))?;
        self.save(&mut budget)?;
        Ok(budget)
    }

    /// Remove an indirect cost rule
    pub fn remove_indirect(&self, id: BudgetId, rule_id: &str) -> ApuResult<Budget> {
        let mut budget = self.require(id)?;
        budget.worksheet.remove_indirect_rule(rule_id)?;
        self.save(&mut budget)?;
        Ok(budget)
    }

    // === Sections ===

    /// Append a section
    pub fn add_section(&self, id: BudgetId, name: &str) -> ApuResult<(Budget, SectionId)> {
        let mut budget = self.require(id)?;
        let section_id = budget.worksheet.add_section(name)?;
        self.save(&mut budget)?;
        Ok((budget, section_id))
    }

    /// Rename a section
    pub fn rename_section(&self, id: BudgetId, section: &str, name: &str) -> ApuResult<Budget> {
        let mut budget = self.require(id)?;
        let section_id = section_id(&budget, section)?;
        budget.worksheet.rename_section(section_id, name)?;
        self.save(&mut budget)?;
        Ok(budget)
    }

    /// Remove a section, moving its lines to the default section
    ///
    /// Returns the budget and the number of lines moved.
    pub fn remove_section(&self, id: BudgetId, section: &str) -> ApuResult<(Budget, usize)> {
        let mut budget = self.require(id)?;
        let section_id = section_id(&budget, section)?;
        let moved = budget.worksheet.remove_section(section_id)?;
        self.save(&mut budget)?;
        Ok((budget, moved))
    }

    // === Persistence ===

    /// Persist a budget
    ///
    /// On success the worksheet is `Saved`; on failure it keeps its pending
    /// changes and the stored copy is left as it was.
    pub fn save(&self, budget: &mut Budget) -> ApuResult<()> {
        save_priced(self.storage, &self.storage.budgets, budget)
    }

    /// Delete a budget
    pub fn delete(&self, id: BudgetId) -> ApuResult<Budget> {
        let budget = self
            .storage
            .budgets
            .delete(id)?
            .ok_or_else(|| ApuError::budget_not_found(id.to_string()))?;
        self.storage.budgets.save()?;

        self.storage.log_delete(&budget)?;

        Ok(budget)
    }

    fn require(&self, id: BudgetId) -> ApuResult<Budget> {
        self.storage
            .budgets
            .get(id)?
            .ok_or_else(|| ApuError::budget_not_found(id.to_string()))
    }
}

fn section_id(budget: &Budget, identifier: &str) -> ApuResult<SectionId> {
    budget
        .worksheet
        .find_section(identifier)
        .map(|s| s.id)
        .ok_or_else(|| ApuError::MissingTargetSection(identifier.to_string()))
}
