//! Unit-price analysis service
//!
//! Analyses are edited through their worksheet and persisted with
//! [`AnalysisService::save`], which moves the worksheet to `Saved` or, when
//! the write fails, leaves it `Dirty`.

use rust_decimal::Decimal;

use crate::config::Settings;
use crate::error::{ApuError, ApuResult};
use crate::models::{Analysis, AnalysisId, LineItem, ResourceCategory};
use crate::pricing::Worksheet;
use crate::storage::Storage;

use super::lines::{apply_update, line_from_catalog, resolve_line, LineUpdate};
use super::persist::save_priced;

/// Service for unit-price analyses
pub struct AnalysisService<'a> {
    storage: &'a Storage,
}

impl<'a> AnalysisService<'a> {
    /// Create a new analysis service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist an empty analysis
    pub fn create(&self, description: &str, unit: &str, code: Option<&str>) -> ApuResult<Analysis> {
        let settings = Settings::load_or_create(self.storage.paths())?;

        let mut analysis = Analysis::new(description.trim(), unit.trim());
        analysis.worksheet = Worksheet::new(&settings.default_section_name);
        if let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) {
            analysis = analysis.with_code(code);
        }
        analysis.validate().map_err(ApuError::Validation)?;

        self.save(&mut analysis)?;
        Ok(analysis)
    }

    /// Get an analysis by ID
    pub fn get(&self, id: AnalysisId) -> ApuResult<Option<Analysis>> {
        self.storage.analyses.get(id)
    }

    /// Find an analysis by code, description or ID
    pub fn find(&self, identifier: &str) -> ApuResult<Option<Analysis>> {
        let wanted = identifier.trim();
        if let Some(analysis) = self
            .storage
            .analyses
            .find(|a| a.code.as_deref() == Some(wanted))?
        {
            return Ok(Some(analysis));
        }
        if let Some(analysis) = self.storage.analyses.get_by_label(wanted)? {
            return Ok(Some(analysis));
        }
        if let Ok(id) = wanted.parse::<AnalysisId>() {
            return self.storage.analyses.get(id);
        }
        self.storage.analyses.find(|a| a.id.matches_prefix(wanted))
    }

    /// All analyses ordered by code
    pub fn list(&self) -> ApuResult<Vec<Analysis>> {
        self.storage.analyses.get_all()
    }

    /// Add a resource line priced from the catalog
    pub fn add_item(
        &self,
        id: AnalysisId,
        catalog_item_id: u64,
        quantity: Option<&str>,
    ) -> ApuResult<Analysis> {
        let mut analysis = self.require(id)?;
        let line = line_from_catalog(self.storage, catalog_item_id, quantity)?;
        analysis.worksheet.add_line(line)?;
        self.save(&mut analysis)?;
        Ok(analysis)
    }

    /// Change quantity, waste or performance of a line
    ///
    /// Returns the analysis and the line's new total.
    pub fn update_item(
        &self,
        id: AnalysisId,
        catalog_item_id: u64,
        category: Option<ResourceCategory>,
        update: &LineUpdate,
    ) -> ApuResult<(Analysis, Decimal)> {
        if update.section.is_some() {
            return Err(ApuError::Validation(
                "Sections apply to budgets, not analyses".into(),
            ));
        }

        let mut analysis = self.require(id)?;
        let key = resolve_line(&analysis.worksheet, catalog_item_id, category)?;
        let total = apply_update(&mut analysis.worksheet, key, update)?;
        self.save(&mut analysis)?;
        Ok((analysis, total))
    }

    /// Remove a line
    pub fn remove_item(
        &self,
        id: AnalysisId,
        catalog_item_id: u64,
        category: Option<ResourceCategory>,
    ) -> ApuResult<(Analysis, LineItem)> {
        let mut analysis = self.require(id)?;
        let key = resolve_line(&analysis.worksheet, catalog_item_id, category)?;
        let line = analysis.worksheet.remove_line(key)?;
        self.save(&mut analysis)?;
        Ok((analysis, line))
    }

    /// Persist an analysis
    ///
    /// On success the worksheet is `Saved`; on failure it keeps its pending
    /// changes and the stored copy is left as it was.
    pub fn save(&self, analysis: &mut Analysis) -> ApuResult<()> {
        save_priced(self.storage, &self.storage.analyses, analysis)
    }

    /// Delete an analysis
    pub fn delete(&self, id: AnalysisId) -> ApuResult<Analysis> {
        let analysis = self
            .storage
            .analyses
            .delete(id)?
            .ok_or_else(|| ApuError::analysis_not_found(id.to_string()))?;
        self.storage.analyses.save()?;

        self.storage.log_delete(&analysis)?;

        Ok(analysis)
    }

    fn require(&self, id: AnalysisId) -> ApuResult<Analysis> {
        self.storage
            .analyses
            .get(id)?
            .ok_or_else(|| ApuError::analysis_not_found(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditFilter, EntityType, Operation};
    use crate::config::paths::ApuPaths;
    use crate::pricing::EditState;
    use crate::services::CatalogService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ApuPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed_catalog(storage: &Storage) {
        let catalog = CatalogService::new(storage);
        catalog
            .create("Cement", "bag", Decimal::from(100), ResourceCategory::Materials, None)
            .unwrap();
        catalog
            .create("Crew", "day", Decimal::from(400), ResourceCategory::Labor, None)
            .unwrap();
    }

    #[test]
    fn test_create_is_saved() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AnalysisService::new(&storage);

        let analysis = service.create("Concrete slab", "m2", Some("02.01")).unwrap();
        assert_eq!(analysis.worksheet.state(), EditState::Saved);
        assert_eq!(service.find("02.01").unwrap().unwrap().id, analysis.id);
        assert_eq!(service.find("concrete slab").unwrap().unwrap().id, analysis.id);
    }

    #[test]
    fn test_unit_price_from_lines() {
        let (_temp_dir, storage) = create_test_storage();
        seed_catalog(&storage);
        let service = AnalysisService::new(&storage);
        let analysis = service.create("Concrete slab", "m2", None).unwrap();

        service.add_item(analysis.id, 1, Some("100")).unwrap();
        service.add_item(analysis.id, 2, Some("100")).unwrap();
        let (analysis, total) = service
            .update_item(
                analysis.id,
                2,
                None,
                &LineUpdate {
                    performance: Some("2".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(total, Decimal::from(20000));
        assert_eq!(analysis.unit_price(), Decimal::from(30000));
        assert!(analysis.worksheet.indirect_costs().is_empty());
    }

    #[test]
    fn test_duplicate_line_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        seed_catalog(&storage);
        let service = AnalysisService::new(&storage);
        let analysis = service.create("Plaster", "m2", None).unwrap();

        service.add_item(analysis.id, 1, None).unwrap();
        let err = service.add_item(analysis.id, 1, None).unwrap_err();
        assert!(err.is_duplicate_line());
        assert_eq!(service.get(analysis.id).unwrap().unwrap().worksheet.lines().len(), 1);
    }

    #[test]
    fn test_failed_save_stays_dirty() {
        let (temp_dir, storage) = create_test_storage();
        seed_catalog(&storage);
        let service = AnalysisService::new(&storage);
        let mut analysis = service.create("Plaster", "m2", None).unwrap();

        analysis
            .worksheet
            .add_line(line_from_catalog(&storage, 1, Some("3")).unwrap())
            .unwrap();
        std::fs::create_dir(temp_dir.path().join("data").join("analyses.json.tmp")).unwrap();

        assert!(service.save(&mut analysis).is_err());
        assert_eq!(analysis.worksheet.state(), EditState::Dirty);
        assert!(service.get(analysis.id).unwrap().unwrap().worksheet.lines().is_empty());
    }

    #[test]
    fn test_section_update_rejected_for_analyses() {
        let (_temp_dir, storage) = create_test_storage();
        seed_catalog(&storage);
        let service = AnalysisService::new(&storage);
        let analysis = service.create("Plaster", "m2", None).unwrap();
        service.add_item(analysis.id, 1, None).unwrap();

        let update = LineUpdate {
            section: Some("Preliminares".into()),
            ..Default::default()
        };
        assert!(service
            .update_item(analysis.id, 1, None, &update)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_remove_and_delete_are_audited() {
        let (_temp_dir, storage) = create_test_storage();
        seed_catalog(&storage);
        let service = AnalysisService::new(&storage);
        let analysis = service.create("Plaster", "m2", None).unwrap();
        service.add_item(analysis.id, 1, None).unwrap();

        let (updated, removed) = service.remove_item(analysis.id, 1, None).unwrap();
        assert_eq!(removed.catalog_item_id, 1);
        assert!(updated.worksheet.lines().is_empty());
        assert_eq!(updated.worksheet.state(), EditState::Saved);

        service.delete(analysis.id).unwrap();
        let last = storage.audit().read_recent(1, &AuditFilter::default()).unwrap();
        assert_eq!(last[0].operation, Operation::Delete);
        assert_eq!(last[0].entity_type, EntityType::Analysis);
    }
}
