//! Editable worksheet
//!
//! A worksheet owns the lines, indirect cost rules and sections of one
//! analysis or budget, together with its roll-up. Every mutating method
//! recomputes the roll-up before returning, so `aggregate()` can never
//! reflect a stale line collection.
//!
//! ```text
//!   new() ──► Empty ──edit──► Dirty ──mark_saved──► Saved
//!                               ▲                     │
//!                               └────────edit─────────┘
//!   loaded() ──► Saved
//! ```
//!
//! A failed save leaves the worksheet `Dirty`.

use std::sync::mpsc::Receiver;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::events::CatalogEvent;
use super::rollup::{compute_aggregate, group_by_category, group_by_section, BudgetAggregate};
use super::rollup::{CategoryGroup, SectionGroup};
use crate::error::{ApuError, ApuResult};
use crate::models::numeric::{coerce_performance, coerce_quantity, coerce_waste};
use crate::models::{
    IndirectCostRule, LineItem, LineKey, Section, SectionId, DEFAULT_SECTION_NAME,
};

/// Edit state of a worksheet relative to its persisted copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditState {
    /// New and without lines
    Empty,
    /// Changed since the last save
    Dirty,
    /// Matches the persisted copy
    Saved,
}

impl std::fmt::Display for EditState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Dirty => write!(f, "unsaved changes"),
            Self::Saved => write!(f, "saved"),
        }
    }
}

/// Lines, indirect costs and sections with their always-current roll-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WorksheetRecord", from = "WorksheetRecord")]
pub struct Worksheet {
    lines: Vec<LineItem>,
    indirect_costs: Vec<IndirectCostRule>,
    sections: Vec<Section>,
    state: EditState,
    ever_saved: bool,
    aggregate: BudgetAggregate,
}

impl Default for Worksheet {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_NAME)
    }
}

impl Worksheet {
    /// Create an empty worksheet holding only the default section
    pub fn new(default_section_name: &str) -> Self {
        Self {
            lines: Vec::new(),
            indirect_costs: Vec::new(),
            sections: vec![Section::default_section(default_section_name)],
            state: EditState::Empty,
            ever_saved: false,
            aggregate: BudgetAggregate::default(),
        }
    }

    /// Seed the indirect cost rules of a new worksheet
    pub fn with_indirect_costs(mut self, rules: Vec<IndirectCostRule>) -> Self {
        self.indirect_costs = rules;
        self.recompute();
        self
    }

    /// Rebuild a worksheet from persisted parts
    ///
    /// The result is `Saved`. A missing default section is restored.
    pub fn loaded(
        lines: Vec<LineItem>,
        indirect_costs: Vec<IndirectCostRule>,
        mut sections: Vec<Section>,
    ) -> Self {
        if !sections.iter().any(Section::is_default) {
            sections.insert(0, Section::default_section(DEFAULT_SECTION_NAME));
        }

        let mut worksheet = Self {
            lines,
            indirect_costs,
            sections,
            state: EditState::Saved,
            ever_saved: true,
            aggregate: BudgetAggregate::default(),
        };
        worksheet.recompute();
        worksheet
    }

    // === Read access ===

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == EditState::Dirty
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, key: LineKey) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.key() == key)
    }

    /// Indirect cost rules with current amounts
    pub fn indirect_costs(&self) -> &[IndirectCostRule] {
        &self.aggregate.indirect_costs
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The roll-up of the current lines and rules
    pub fn aggregate(&self) -> &BudgetAggregate {
        &self.aggregate
    }

    pub fn direct_total(&self) -> Decimal {
        self.aggregate.direct_total
    }

    pub fn grand_total(&self) -> Decimal {
        self.aggregate.grand_total
    }

    /// Lines grouped by resource category
    pub fn by_category(&self) -> Vec<CategoryGroup<'_>> {
        group_by_category(&self.lines)
    }

    /// Lines grouped by section
    pub fn by_section(&self) -> ApuResult<Vec<SectionGroup<'_>>> {
        group_by_section(&self.lines, &self.sections)
    }

    /// Find a section by exact ID, short ID or case-insensitive name
    pub fn find_section(&self, identifier: &str) -> Option<&Section> {
        let lower = identifier.to_lowercase();
        self.sections
            .iter()
            .find(|s| s.name.to_lowercase() == lower)
            .or_else(|| {
                self.sections
                    .iter()
                    .find(|s| s.id.to_string() == identifier || s.id.matches_prefix(identifier))
            })
    }

    // === Lines ===

    /// Add a line
    ///
    /// A second line with the same catalog item and category is rejected,
    /// as is a line pointing at an unknown section.
    pub fn add_line(&mut self, line: LineItem) -> ApuResult<()> {
        let key = line.key();
        if self.line(key).is_some() {
            return Err(ApuError::DuplicateLineItem {
                catalog_item_id: key.catalog_item_id,
                category: key.category,
            });
        }

        if let Some(section_id) = line.section_id {
            self.require_section(section_id)?;
        }

        self.lines.push(line);
        self.touch();
        Ok(())
    }

    /// Add a line directly into a section
    pub fn add_line_to_section(&mut self, line: LineItem, section_id: SectionId) -> ApuResult<()> {
        self.add_line(line.in_section(section_id))
    }

    /// Remove a line, returning it
    pub fn remove_line(&mut self, key: LineKey) -> ApuResult<LineItem> {
        let index = self
            .lines
            .iter()
            .position(|l| l.key() == key)
            .ok_or_else(|| ApuError::line_item_not_found(key.catalog_item_id, key.category))?;

        let line = self.lines.remove(index);
        self.touch();
        Ok(line)
    }

    /// Set a line's quantity; unusable input counts as zero
    pub fn set_quantity(&mut self, key: LineKey, quantity: Option<Decimal>) -> ApuResult<Decimal> {
        let line = self.line_mut(key)?;
        line.quantity = coerce_quantity(quantity);
        self.touch();
        Ok(self.total_of(key))
    }

    /// Set a material line's waste percentage; unusable input counts as zero
    pub fn set_waste(&mut self, key: LineKey, waste: Option<Decimal>) -> ApuResult<Decimal> {
        let line = self.line_mut(key)?;
        if !line.set_waste_percentage(coerce_waste(waste)) {
            return Err(ApuError::Validation(format!(
                "Waste percentage applies only to materials, not {}",
                key.category
            )));
        }
        self.touch();
        Ok(self.total_of(key))
    }

    /// Set a labor or equipment line's performance divisor
    ///
    /// Unusable, zero or negative input is clamped to one.
    pub fn set_performance(
        &mut self,
        key: LineKey,
        performance: Option<Decimal>,
    ) -> ApuResult<Decimal> {
        let line = self.line_mut(key)?;
        if !line.set_performance(coerce_performance(performance)) {
            return Err(ApuError::Validation(format!(
                "Performance applies only to labor and equipment, not {}",
                key.category
            )));
        }
        self.touch();
        Ok(self.total_of(key))
    }

    /// Move a line into a section
    pub fn move_line_to_section(&mut self, key: LineKey, section_id: SectionId) -> ApuResult<()> {
        self.require_section(section_id)?;
        let line = self.line_mut(key)?;
        line.section_id = Some(section_id);
        self.touch();
        Ok(())
    }

    // === Indirect costs ===

    /// Add an indirect cost rule; rule IDs are unique
    pub fn add_indirect_rule(&mut self, rule: IndirectCostRule) -> ApuResult<()> {
        if self.indirect_costs.iter().any(|r| r.id == rule.id) {
            return Err(ApuError::Duplicate {
                entity_type: "Indirect cost",
                identifier: rule.id,
            });
        }
        self.indirect_costs.push(rule);
        self.touch();
        Ok(())
    }

    /// Change a rule's percentage; unusable input counts as zero
    pub fn set_indirect_percentage(
        &mut self,
        rule_id: &str,
        percentage: Option<Decimal>,
    ) -> ApuResult<Decimal> {
        let rule = self
            .indirect_costs
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| indirect_not_found(rule_id))?;
        rule.percentage = percentage.unwrap_or(Decimal::ZERO);
        self.touch();

        Ok(self
            .indirect_costs()
            .iter()
            .find(|r| r.id == rule_id)
            .map(|r| r.amount)
            .unwrap_or(Decimal::ZERO))
    }

    /// Remove a rule, returning it
    pub fn remove_indirect_rule(&mut self, rule_id: &str) -> ApuResult<IndirectCostRule> {
        let index = self
            .indirect_costs
            .iter()
            .position(|r| r.id == rule_id)
            .ok_or_else(|| indirect_not_found(rule_id))?;
        let rule = self.indirect_costs.remove(index);
        self.touch();
        Ok(rule)
    }

    // === Sections ===

    /// Append a section after the current last one
    pub fn add_section(&mut self, name: &str) -> ApuResult<SectionId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApuError::Validation("Section name cannot be empty".into()));
        }
        if self.find_section(name).is_some() {
            return Err(ApuError::Duplicate {
                entity_type: "Section",
                identifier: name.to_string(),
            });
        }

        let order = self.sections.iter().map(|s| s.order).max().unwrap_or(-1) + 1;
        let section = Section::new(name, order);
        let id = section.id;
        self.sections.push(section);
        self.touch();
        Ok(id)
    }

    /// Rename a section
    pub fn rename_section(&mut self, section_id: SectionId, name: &str) -> ApuResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApuError::Validation("Section name cannot be empty".into()));
        }
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| ApuError::MissingTargetSection(section_id.to_string()))?;
        section.name = name.to_string();
        self.touch();
        Ok(())
    }

    /// Remove a section, moving its lines to the default section
    ///
    /// Returns the number of lines moved.
    pub fn remove_section(&mut self, section_id: SectionId) -> ApuResult<usize> {
        let index = self
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| ApuError::MissingTargetSection(section_id.to_string()))?;

        if self.sections[index].is_default() {
            return Err(ApuError::ProtectedSection(self.sections[index].name.clone()));
        }

        self.sections.remove(index);

        let mut moved = 0;
        for line in self.lines.iter_mut().filter(|l| l.section_id == Some(section_id)) {
            line.section_id = Some(SectionId::default_section());
            moved += 1;
        }

        self.touch();
        Ok(moved)
    }

    // === Catalog events ===

    /// Refresh line snapshots from a catalog change
    ///
    /// Lines stay in place when their catalog item is deleted. Returns the
    /// number of lines refreshed.
    pub fn apply_catalog_event(&mut self, event: &CatalogEvent) -> usize {
        let item = match event {
            CatalogEvent::Updated(item) => item,
            CatalogEvent::Created(_) | CatalogEvent::Deleted { .. } => return 0,
        };

        let key = LineKey::new(item.id, item.category);
        let mut refreshed = 0;
        for line in self.lines.iter_mut().filter(|l| l.key() == key) {
            if line.unit_price != item.unit_price || line.name != item.name || line.unit != item.unit {
                line.refresh_from_catalog(item);
                refreshed += 1;
            }
        }

        if refreshed > 0 {
            self.touch();
        }
        refreshed
    }

    /// Apply every event waiting on a subscription
    pub fn apply_pending(&mut self, events: &Receiver<CatalogEvent>) -> usize {
        events
            .try_iter()
            .map(|event| self.apply_catalog_event(&event))
            .sum()
    }

    // === Persistence state ===

    /// Record a successful save
    pub fn mark_saved(&mut self) {
        self.state = EditState::Saved;
        self.ever_saved = true;
    }

    /// Record a failed save; pending changes stay pending
    pub fn mark_save_failed(&mut self) {
        if self.state == EditState::Saved {
            return;
        }
        if !self.lines.is_empty() || self.ever_saved {
            self.state = EditState::Dirty;
        }
    }

    // === Internals ===

    fn line_mut(&mut self, key: LineKey) -> ApuResult<&mut LineItem> {
        self.lines
            .iter_mut()
            .find(|l| l.key() == key)
            .ok_or_else(|| ApuError::line_item_not_found(key.catalog_item_id, key.category))
    }

    fn total_of(&self, key: LineKey) -> Decimal {
        self.line(key).map(LineItem::total).unwrap_or(Decimal::ZERO)
    }

    fn require_section(&self, section_id: SectionId) -> ApuResult<()> {
        if self.sections.iter().any(|s| s.id == section_id) {
            Ok(())
        } else {
            Err(ApuError::MissingTargetSection(section_id.to_string()))
        }
    }

    fn touch(&mut self) {
        self.state = if self.lines.is_empty() && !self.ever_saved {
            EditState::Empty
        } else {
            EditState::Dirty
        };
        self.recompute();
    }

    fn recompute(&mut self) {
        self.aggregate = compute_aggregate(&self.lines, &self.indirect_costs);
    }
}

fn indirect_not_found(rule_id: &str) -> ApuError {
    ApuError::NotFound {
        entity_type: "Indirect cost",
        identifier: rule_id.to_string(),
    }
}

/// Wire shape of a worksheet
///
/// The roll-up totals are written for consumers and recomputed on read.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorksheetRecord {
    #[serde(default)]
    sections: Vec<Section>,
    #[serde(default)]
    lines: Vec<LineItem>,
    #[serde(default)]
    indirect_costs: Vec<IndirectCostRule>,
    #[serde(default, skip_deserializing)]
    direct_total: Decimal,
    #[serde(default, skip_deserializing)]
    indirect_total: Decimal,
    #[serde(default, skip_deserializing)]
    grand_total: Decimal,
}

impl From<Worksheet> for WorksheetRecord {
    fn from(worksheet: Worksheet) -> Self {
        Self {
            sections: worksheet.sections,
            lines: worksheet.lines,
            indirect_costs: worksheet.aggregate.indirect_costs,
            direct_total: worksheet.aggregate.direct_total,
            indirect_total: worksheet.aggregate.indirect_total,
            grand_total: worksheet.aggregate.grand_total,
        }
    }
}

impl From<WorksheetRecord> for Worksheet {
    fn from(record: WorksheetRecord) -> Self {
        Worksheet::loaded(record.lines, record.indirect_costs, record.sections)
    }
}
