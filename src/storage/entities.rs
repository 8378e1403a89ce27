//! Persistence for clients, projects, analyses and budgets

use crate::models::{Analysis, AnalysisId, Budget, BudgetId, Client, ClientId, Project, ProjectId};

use super::repository::{JsonRepository, Record};

impl Record for Client {
    type Id = ClientId;

    fn record_id(&self) -> ClientId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Record for Project {
    type Id = ProjectId;

    fn record_id(&self) -> ProjectId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Record for Analysis {
    type Id = AnalysisId;

    fn record_id(&self) -> AnalysisId {
        self.id
    }

    fn label(&self) -> &str {
        &self.description
    }

    fn listing_order(a: &Self, b: &Self) -> std::cmp::Ordering {
        a.code
            .cmp(&b.code)
            .then_with(|| a.description.to_lowercase().cmp(&b.description.to_lowercase()))
    }
}

impl Record for Budget {
    type Id = BudgetId;

    fn record_id(&self) -> BudgetId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Repository for clients.json
pub type ClientRepository = JsonRepository<Client>;

/// Repository for projects.json
pub type ProjectRepository = JsonRepository<Project>;

/// Repository for analyses.json
pub type AnalysisRepository = JsonRepository<Analysis>;

/// Repository for budgets.json
pub type BudgetRepository = JsonRepository<Budget>;

impl JsonRepository<Project> {
    /// Projects belonging to a client
    pub fn get_by_client(&self, client_id: ClientId) -> Result<Vec<Project>, crate::error::ApuError> {
        self.filter(|p| p.client_id == Some(client_id))
    }
}

impl JsonRepository<Budget> {
    /// Budgets attached to a project
    pub fn get_by_project(&self, project_id: ProjectId) -> Result<Vec<Budget>, crate::error::ApuError> {
        self.filter(|b| b.project_id == Some(project_id))
    }
}
