//! Client service

use crate::error::{ApuError, ApuResult};
use crate::models::{Client, ClientId};
use crate::storage::Storage;

/// Contact details for a new client
#[derive(Debug, Clone, Default)]
pub struct ClientDetails {
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Service for client management
pub struct ClientService<'a> {
    storage: &'a Storage,
}

impl<'a> ClientService<'a> {
    /// Create a new client service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a client
    pub fn create(&self, name: &str, details: ClientDetails) -> ApuResult<Client> {
        let name = name.trim();
        if self.storage.clients.label_exists(name, None)? {
            return Err(ApuError::Duplicate {
                entity_type: "Client",
                identifier: name.to_string(),
            });
        }

        let mut client = Client::new(name);
        client.tax_id = non_empty(details.tax_id);
        client.email = non_empty(details.email);
        client.phone = non_empty(details.phone);
        client.validate().map_err(ApuError::Validation)?;

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.storage.log_create(&client)?;

        Ok(client)
    }

    /// Get a client by ID
    pub fn get(&self, id: ClientId) -> ApuResult<Option<Client>> {
        self.storage.clients.get(id)
    }

    /// Find a client by name or ID (full or short form)
    pub fn find(&self, identifier: &str) -> ApuResult<Option<Client>> {
        if let Some(client) = self.storage.clients.get_by_label(identifier)? {
            return Ok(Some(client));
        }
        if let Ok(id) = identifier.parse::<ClientId>() {
            return self.storage.clients.get(id);
        }
        self.storage.clients.find(|c| c.id.matches_prefix(identifier))
    }

    /// All clients by name
    pub fn list(&self) -> ApuResult<Vec<Client>> {
        self.storage.clients.get_all()
    }

    /// Delete a client that no project refers to
    pub fn delete(&self, id: ClientId) -> ApuResult<Client> {
        let projects = self.storage.projects.get_by_client(id)?;
        if !projects.is_empty() {
            return Err(ApuError::Validation(format!(
                "Client has {} project(s); delete or reassign them first",
                projects.len()
            )));
        }

        let client = self
            .storage
            .clients
            .delete(id)?
            .ok_or_else(|| ApuError::client_not_found(id.to_string()))?;
        self.storage.clients.save()?;

        self.storage.log_delete(&client)?;

        Ok(client)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ApuPaths;
    use crate::services::ProjectService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ApuPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);

        let client = service
            .create(
                "Constructora Andina",
                ClientDetails {
                    email: Some(" obras@andina.pe ".into()),
                    phone: Some("".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(client.email.as_deref(), Some("obras@andina.pe"));
        assert!(client.phone.is_none());
        assert_eq!(service.find("constructora andina").unwrap().unwrap().id, client.id);
        assert_eq!(service.find(&client.id.to_string()).unwrap().unwrap().id, client.id);
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);
        service.create("Acme", ClientDetails::default()).unwrap();

        assert!(matches!(
            service.create("ACME", ClientDetails::default()),
            Err(ApuError::Duplicate { .. })
        ));
        assert!(service.create("  ", ClientDetails::default()).unwrap_err().is_validation());
    }

    #[test]
    fn test_delete_blocked_by_projects() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);
        let client = service.create("Acme", ClientDetails::default()).unwrap();
        let project = ProjectService::new(&storage)
            .create("Bridge", Some(client.id), None)
            .unwrap();

        assert!(service.delete(client.id).unwrap_err().is_validation());

        ProjectService::new(&storage).delete(project.id).unwrap();
        service.delete(client.id).unwrap();
        assert!(service.list().unwrap().is_empty());
    }
}
