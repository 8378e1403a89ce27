//! Catalog item persistence (catalog.json)

use std::cmp::Ordering;

use crate::error::ApuError;
use crate::models::{CatalogItem, ResourceCategory};

use super::repository::{JsonRepository, Record};

impl Record for CatalogItem {
    type Id = u64;

    fn record_id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn listing_order(a: &Self, b: &Self) -> Ordering {
        a.id.cmp(&b.id)
    }
}

/// Repository for the supply catalog
pub type CatalogRepository = JsonRepository<CatalogItem>;

impl JsonRepository<CatalogItem> {
    /// Next free catalog identifier
    pub fn next_id(&self) -> Result<u64, ApuError> {
        let max = self.get_all()?.iter().map(|item| item.id).max().unwrap_or(0);
        Ok(max + 1)
    }

    /// Items of one category, ordered by ID
    pub fn get_by_category(&self, category: ResourceCategory) -> Result<Vec<CatalogItem>, ApuError> {
        self.filter(|item| item.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[test]
    fn test_next_id_and_category_filter() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CatalogRepository::new(temp_dir.path().join("catalog.json"));
        assert_eq!(repo.next_id().unwrap(), 1);

        repo.upsert(CatalogItem::new(4, "Cement", "bag", Decimal::from(25), ResourceCategory::Materials))
            .unwrap();
        repo.upsert(CatalogItem::new(2, "Mason", "day", Decimal::from(60), ResourceCategory::Labor))
            .unwrap();

        assert_eq!(repo.next_id().unwrap(), 5);
        let labor = repo.get_by_category(ResourceCategory::Labor).unwrap();
        assert_eq!(labor.len(), 1);
        assert_eq!(labor[0].name, "Mason");
    }

    #[test]
    fn test_listing_is_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CatalogRepository::new(temp_dir.path().join("catalog.json"));
        repo.upsert(CatalogItem::new(9, "Aggregate", "m3", Decimal::ONE, ResourceCategory::Materials))
            .unwrap();
        repo.upsert(CatalogItem::new(3, "Truck", "trip", Decimal::ONE, ResourceCategory::Transport))
            .unwrap();

        let ids: Vec<u64> = repo.get_all().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 9]);
    }
}
