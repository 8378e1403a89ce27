//! Storage layer for APU-CLI
//!
//! JSON file storage with atomic writes, one file per collection, plus the
//! audit log every mutation is recorded in.

pub mod catalog;
pub mod entities;
pub mod file_io;
pub mod init;
pub mod repository;

pub use catalog::CatalogRepository;
pub use entities::{AnalysisRepository, BudgetRepository, ClientRepository, ProjectRepository};
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use repository::{JsonRepository, Record};

use crate::audit::{AuditEntry, AuditLogger, Audited};
use crate::config::paths::ApuPaths;
use crate::error::ApuError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: ApuPaths,
    pub catalog: CatalogRepository,
    pub clients: ClientRepository,
    pub projects: ProjectRepository,
    pub analyses: AnalysisRepository,
    pub budgets: BudgetRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance (nothing is loaded yet)
    pub fn new(paths: ApuPaths) -> Result<Self, ApuError> {
        paths.ensure_directories()?;

        Ok(Self {
            catalog: CatalogRepository::new(paths.catalog_file()),
            clients: ClientRepository::new(paths.clients_file()),
            projects: ProjectRepository::new(paths.projects_file()),
            analyses: AnalysisRepository::new(paths.analyses_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &ApuPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), ApuError> {
        self.catalog.load()?;
        self.clients.load()?;
        self.projects.load()?;
        self.analyses.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), ApuError> {
        self.catalog.save()?;
        self.clients.save()?;
        self.projects.save()?;
        self.analyses.save()?;
        self.budgets.save()?;
        Ok(())
    }

    /// Record a created entity in the audit log
    pub fn log_create<T: Audited>(&self, record: &T) -> Result<(), ApuError> {
        self.audit.log(&AuditEntry::created(record)).map(|_| ())
    }

    /// Record an update; nothing is written when no field changed
    pub fn log_update<T: Audited>(&self, before: &T, after: &T) -> Result<(), ApuError> {
        self.audit.log(&AuditEntry::updated(before, after)).map(|_| ())
    }

    /// Record a deleted entity in the audit log
    pub fn log_delete<T: Audited>(&self, record: &T) -> Result<(), ApuError> {
        self.audit.log(&AuditEntry::deleted(record)).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{EntityType, Operation};
    use crate::models::Client;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ApuPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert_eq!(storage.catalog.count().unwrap(), 0);
    }

    #[test]
    fn test_log_helpers_write_entries() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(ApuPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let client = Client::new("Constructora Andina");

        storage.log_create(&client).unwrap();
        storage.log_update(&client, &client).unwrap();
        storage.log_delete(&client).unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_type, EntityType::Client);
        assert_eq!(entries[0].entity_name, "Constructora Andina");
        assert_eq!(entries[1].operation, Operation::Delete);
    }
}
