//! Project service

use crate::error::{ApuError, ApuResult};
use crate::models::{ClientId, Project, ProjectId, ProjectStatus};
use crate::storage::Storage;

/// Service for project management
pub struct ProjectService<'a> {
    storage: &'a Storage,
}

impl<'a> ProjectService<'a> {
    /// Create a new project service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a project, optionally for a client
    pub fn create(
        &self,
        name: &str,
        client_id: Option<ClientId>,
        location: Option<&str>,
    ) -> ApuResult<Project> {
        let name = name.trim();
        if self.storage.projects.label_exists(name, None)? {
            return Err(ApuError::Duplicate {
                entity_type: "Project",
                identifier: name.to_string(),
            });
        }

        let mut project = Project::new(name);
        if let Some(client_id) = client_id {
            if self.storage.clients.get(client_id)?.is_none() {
                return Err(ApuError::client_not_found(client_id.to_string()));
            }
            project = project.for_client(client_id);
        }
        project.location = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from);
        project.validate().map_err(ApuError::Validation)?;

        self.storage.projects.upsert(project.clone())?;
        self.storage.projects.save()?;

        self.storage.log_create(&project)?;

        Ok(project)
    }

    /// Get a project by ID
    pub fn get(&self, id: ProjectId) -> ApuResult<Option<Project>> {
        self.storage.projects.get(id)
    }

    /// Find a project by name or ID (full or short form)
    pub fn find(&self, identifier: &str) -> ApuResult<Option<Project>> {
        if let Some(project) = self.storage.projects.get_by_label(identifier)? {
            return Ok(Some(project));
        }
        if let Ok(id) = identifier.parse::<ProjectId>() {
            return self.storage.projects.get(id);
        }
        self.storage.projects.find(|p| p.id.matches_prefix(identifier))
    }

    /// List projects, optionally for one client
    pub fn list(&self, client_id: Option<ClientId>) -> ApuResult<Vec<Project>> {
        match client_id {
            Some(client_id) => self.storage.projects.get_by_client(client_id),
            None => self.storage.projects.get_all(),
        }
    }

    /// Move a project to another lifecycle status
    pub fn set_status(&self, id: ProjectId, status: ProjectStatus) -> ApuResult<Project> {
        let mut project = self
            .storage
            .projects
            .get(id)?
            .ok_or_else(|| ApuError::project_not_found(id.to_string()))?;
        let before = project.clone();

        project.status = status;
        project.updated_at = chrono::Utc::now();

        self.storage.projects.upsert(project.clone())?;
        self.storage.projects.save()?;

        self.storage.log_update(&before, &project)?;

        Ok(project)
    }

    /// Delete a project that no budget refers to
    pub fn delete(&self, id: ProjectId) -> ApuResult<Project> {
        let budgets = self.storage.budgets.get_by_project(id)?;
        if !budgets.is_empty() {
            return Err(ApuError::Validation(format!(
                "Project has {} budget(s); delete them first",
                budgets.len()
            )));
        }

        let project = self
            .storage
            .projects
            .delete(id)?
            .ok_or_else(|| ApuError::project_not_found(id.to_string()))?;
        self.storage.projects.save()?;

        self.storage.log_delete(&project)?;

        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ApuPaths;
    use crate::services::{BudgetService, ClientDetails, ClientService};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ApuPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_for_client() {
        let (_temp_dir, storage) = create_test_storage();
        let client = ClientService::new(&storage)
            .create("Acme", ClientDetails::default())
            .unwrap();
        let service = ProjectService::new(&storage);

        let project = service.create("Bridge", Some(client.id), Some("Cusco")).unwrap();
        assert_eq!(project.status, ProjectStatus::Planning);
        assert_eq!(project.location.as_deref(), Some("Cusco"));
        assert_eq!(service.list(Some(client.id)).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_client_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);
        let err = service.create("Bridge", Some(ClientId::new()), None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_set_status_is_audited() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);
        let project = service.create("School", None, None).unwrap();

        let updated = service.set_status(project.id, ProjectStatus::Active).unwrap();
        assert_eq!(updated.status, ProjectStatus::Active);

        let entries = storage.audit().read_all().unwrap();
        let changes = entries.last().unwrap().changes.as_deref().unwrap();
        assert!(changes.contains("status: \"planning\" -> \"active\""));
    }

    #[test]
    fn test_delete_blocked_by_budgets() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);
        let project = service.create("School", None, None).unwrap();
        BudgetService::new(&storage)
            .create("Phase 1", Some(project.id))
            .unwrap();

        assert!(service.delete(project.id).unwrap_err().is_validation());
    }
}
