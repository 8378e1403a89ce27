//! Catalog service
//!
//! CRUD over the supply catalog. Every mutation returns the resulting
//! [`CatalogEvent`] and publishes it to the service's notifier.

use rust_decimal::Decimal;

use crate::error::{ApuError, ApuResult};
use crate::models::{CatalogItem, ResourceCategory};
use crate::pricing::{CatalogEvent, CatalogNotifier};
use crate::storage::Storage;

use super::{AnalysisService, BudgetService};

/// Optional field changes for a catalog item
#[derive(Debug, Clone, Default)]
pub struct CatalogItemUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub supplier_type: Option<String>,
}

/// How many stored worksheets a set of catalog events touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    pub analyses: usize,
    pub budgets: usize,
    pub lines: usize,
}

/// Service for catalog management
pub struct CatalogService<'a> {
    storage: &'a Storage,
    notifier: CatalogNotifier,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            notifier: CatalogNotifier::new(),
        }
    }

    /// Notifier the service publishes every change to
    pub fn notifier(&self) -> &CatalogNotifier {
        &self.notifier
    }

    /// Add an item to the catalog
    pub fn create(
        &self,
        name: &str,
        unit: &str,
        unit_price: Decimal,
        category: ResourceCategory,
        supplier_type: Option<&str>,
    ) -> ApuResult<CatalogEvent> {
        let name = name.trim();
        let id = self.storage.catalog.next_id()?;

        let mut item = CatalogItem::new(id, name, unit.trim(), unit_price, category);
        if let Some(supplier) = supplier_type.map(str::trim).filter(|s| !s.is_empty()) {
            item = item.with_supplier_type(supplier);
        }
        item.validate()
            .map_err(|e| ApuError::Validation(e.to_string()))?;

        self.storage.catalog.upsert(item.clone())?;
        self.storage.catalog.save()?;

        self.storage.log_create(&item)?;

        Ok(self.emit(CatalogEvent::Created(item)))
    }

    /// Get an item by ID
    pub fn get(&self, id: u64) -> ApuResult<Option<CatalogItem>> {
        self.storage.catalog.get(id)
    }

    /// Find an item by ID or exact name
    pub fn find(&self, identifier: &str) -> ApuResult<Option<CatalogItem>> {
        if let Ok(id) = identifier.trim().trim_start_matches('#').parse::<u64>() {
            if let Some(item) = self.storage.catalog.get(id)? {
                return Ok(Some(item));
            }
        }
        self.storage.catalog.get_by_label(identifier)
    }

    /// List items, optionally restricted to one category
    pub fn list(&self, category: Option<ResourceCategory>) -> ApuResult<Vec<CatalogItem>> {
        match category {
            Some(category) => self.storage.catalog.get_by_category(category),
            None => self.storage.catalog.get_all(),
        }
    }

    /// Items whose name contains `query` (case-insensitive)
    pub fn search(&self, query: &str) -> ApuResult<Vec<CatalogItem>> {
        let query = query.trim().to_lowercase();
        self.storage
            .catalog
            .filter(|item| item.name.to_lowercase().contains(&query))
    }

    /// Edit an item; the category is part of its identity and cannot change
    pub fn update(&self, id: u64, changes: CatalogItemUpdate) -> ApuResult<CatalogEvent> {
        let mut item = self
            .storage
            .catalog
            .get(id)?
            .ok_or_else(|| ApuError::catalog_item_not_found(id.to_string()))?;
        let before = item.clone();

        if let Some(name) = changes.name {
            item.name = name.trim().to_string();
        }
        if let Some(unit) = changes.unit {
            item.unit = unit.trim().to_string();
        }
        if let Some(supplier) = changes.supplier_type {
            let supplier = supplier.trim();
            item.supplier_type = (!supplier.is_empty()).then(|| supplier.to_string());
        }
        if let Some(price) = changes.unit_price {
            item.set_unit_price(price);
        }
        item.updated_at = chrono::Utc::now();

        item.validate()
            .map_err(|e| ApuError::Validation(e.to_string()))?;

        self.storage.catalog.upsert(item.clone())?;
        self.storage.catalog.save()?;

        self.storage.log_update(&before, &item)?;

        Ok(self.emit(CatalogEvent::Updated(item)))
    }

    /// Remove an item; lines already priced from it keep their snapshot
    pub fn delete(&self, id: u64) -> ApuResult<CatalogEvent> {
        let item = self
            .storage
            .catalog
            .delete(id)?
            .ok_or_else(|| ApuError::catalog_item_not_found(id.to_string()))?;
        self.storage.catalog.save()?;

        self.storage.log_delete(&item)?;

        Ok(self.emit(CatalogEvent::Deleted {
            id: item.id,
            category: item.category,
        }))
    }

    /// Apply catalog events to every stored analysis and budget and save
    /// the ones whose lines changed
    pub fn propagate(&self, events: &[CatalogEvent]) -> ApuResult<PropagationReport> {
        let mut report = PropagationReport::default();

        let analyses = AnalysisService::new(self.storage);
        for mut analysis in self.storage.analyses.get_all()? {
            let refreshed: usize = events
                .iter()
                .map(|e| analysis.worksheet.apply_catalog_event(e))
                .sum();
            if refreshed > 0 {
                analyses.save(&mut analysis)?;
                report.analyses += 1;
                report.lines += refreshed;
            }
        }

        let budgets = BudgetService::new(self.storage);
        for mut budget in self.storage.budgets.get_all()? {
            let refreshed: usize = events
                .iter()
                .map(|e| budget.worksheet.apply_catalog_event(e))
                .sum();
            if refreshed > 0 {
                budgets.save(&mut budget)?;
                report.budgets += 1;
                report.lines += refreshed;
            }
        }

        Ok(report)
    }

    fn emit(&self, event: CatalogEvent) -> CatalogEvent {
        self.notifier.publish(&event);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ApuPaths;
    use crate::models::LineItem;
    use crate::pricing::Worksheet;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ApuPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn cement(service: &CatalogService) -> CatalogItem {
        service
            .create("Cement", "bag", Decimal::from(25), ResourceCategory::Materials, None)
            .unwrap()
            .item()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_create_allocates_ids() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let first = cement(&service);
        let second = service
            .create("Mason", "day", Decimal::from(60), ResourceCategory::Labor, Some("crew"))
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.item_id(), 2);
        assert_eq!(second.item().unwrap().supplier_type.as_deref(), Some("crew"));
    }

    #[test]
    fn test_create_rejects_negative_price() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let err = service
            .create("Sand", "m3", Decimal::from(-1), ResourceCategory::Materials, None)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.list(None).unwrap().len(), 0);
    }

    #[test]
    fn test_update_publishes_event_to_open_worksheets() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        let item = cement(&service);

        let mut worksheet = Worksheet::default();
        worksheet
            .add_line(LineItem::from_catalog(&item).with_quantity(Decimal::from(4)))
            .unwrap();
        let events = service.notifier().subscribe();

        service
            .update(
                item.id,
                CatalogItemUpdate {
                    unit_price: Some(Decimal::from(30)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(worksheet.apply_pending(&events), 1);
        assert_eq!(worksheet.direct_total(), Decimal::from(120));
    }

    #[test]
    fn test_find_search_and_filter() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        cement(&service);
        service
            .create("White cement", "kg", Decimal::from(3), ResourceCategory::Materials, None)
            .unwrap();
        service
            .create("Dump truck", "trip", Decimal::from(200), ResourceCategory::Transport, None)
            .unwrap();

        assert_eq!(service.find("#3").unwrap().unwrap().name, "Dump truck");
        assert_eq!(service.find("cement").unwrap().unwrap().id, 1);
        assert_eq!(service.search("CEMENT").unwrap().len(), 2);
        assert_eq!(service.list(Some(ResourceCategory::Transport)).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_and_audit_trail() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        let item = cement(&service);

        let event = service.delete(item.id).unwrap();
        assert_eq!(
            event,
            CatalogEvent::Deleted {
                id: item.id,
                category: ResourceCategory::Materials
            }
        );
        assert!(service.get(item.id).unwrap().is_none());
        assert!(service.delete(item.id).unwrap_err().is_not_found());
        assert_eq!(storage.audit().read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_propagate_reprices_stored_budgets() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);
        let item = cement(&service);

        let budgets = BudgetService::new(&storage);
        let budget = budgets.create("Warehouse", None).unwrap();
        budgets.add_item(budget.id, item.id, Some("10"), None).unwrap();

        let event = service
            .update(
                item.id,
                CatalogItemUpdate {
                    unit_price: Some(Decimal::from(40)),
                    ..Default::default()
                },
            )
            .unwrap();

        let report = service.propagate(&[event]).unwrap();
        assert_eq!(report, PropagationReport { analyses: 0, budgets: 1, lines: 1 });

        let stored = storage.budgets.get(budget.id).unwrap().unwrap();
        assert_eq!(stored.worksheet.direct_total(), Decimal::from(400));
    }
}
