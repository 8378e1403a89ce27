//! Storage initialization
//!
//! First-run setup: directories, settings file and a starter catalog.

use rust_decimal::Decimal;

use crate::config::{ApuPaths, Settings};
use crate::error::ApuError;
use crate::models::{CatalogItem, ResourceCategory};

use super::catalog::CatalogRepository;

/// Initialize storage for a fresh installation
///
/// Existing settings and catalog files are left untouched.
pub fn initialize_storage(paths: &ApuPaths) -> Result<(), ApuError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    if !paths.catalog_file().exists() {
        seed_catalog(paths)?;
    }

    Ok(())
}

/// Starter catalog: a few common resources per category
fn starter_items() -> Vec<CatalogItem> {
    use ResourceCategory::*;

    let rows: [(&str, &str, Decimal, ResourceCategory); 9] = [
        ("Portland cement type I", "bag", Decimal::new(2850, 2), Materials),
        ("Coarse sand", "m3", Decimal::new(4500, 2), Materials),
        ("Crushed stone 1/2\"", "m3", Decimal::new(5200, 2), Materials),
        ("Corrugated rebar 3/8\"", "kg", Decimal::new(420, 2), Materials),
        ("Concrete mixer 9 p3", "day", Decimal::new(12000, 2), Equipment),
        ("Concrete vibrator", "day", Decimal::new(6000, 2), Equipment),
        ("Foreman", "day", Decimal::new(11000, 2), Labor),
        ("Laborer", "day", Decimal::new(7000, 2), Labor),
        ("Materials freight", "trip", Decimal::new(25000, 2), Transport),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (name, unit, price, category))| {
            CatalogItem::new(i as u64 + 1, name, unit, price, category)
        })
        .collect()
}

fn seed_catalog(paths: &ApuPaths) -> Result<(), ApuError> {
    let repo = CatalogRepository::new(paths.catalog_file());
    for item in starter_items() {
        repo.upsert(item)?;
    }
    repo.save()
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &ApuPaths) -> bool {
    !paths.is_initialized()
}
