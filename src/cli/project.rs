//! Project CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::display::format_project_list;
use crate::error::{ApuError, ApuResult};
use crate::models::{ClientId, ProjectStatus};
use crate::services::{ClientService, ProjectService};
use crate::storage::Storage;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Add a project
    Add {
        /// Project name
        name: String,
        /// Client name or ID
        #[arg(short, long)]
        client: Option<String>,
        /// Site location
        #[arg(short, long)]
        location: Option<String>,
    },
    /// List projects
    List {
        /// Only projects of this client
        #[arg(short, long)]
        client: Option<String>,
    },
    /// Change a project's status
    Status {
        /// Project name or ID
        project: String,
        /// New status (planning, active, completed, cancelled)
        status: String,
    },
    /// Delete a project without budgets
    Delete {
        /// Project name or ID
        project: String,
    },
}

/// Handle a project command
pub fn handle_project_command(storage: &Storage, cmd: ProjectCommands) -> ApuResult<()> {
    let service = ProjectService::new(storage);

    match cmd {
        ProjectCommands::Add {
            name,
            client,
            location,
        } => {
            let client_id = client
                .as_deref()
                .map(|c| find_client(storage, c))
                .transpose()?;
            let project = service.create(&name, client_id, location.as_deref())?;
            println!("Created project: {}", project.name);
            println!("  Status: {}", project.status);
            println!("  ID: {}", project.id);
        }

        ProjectCommands::List { client } => {
            let client_id = client
                .as_deref()
                .map(|c| find_client(storage, c))
                .transpose()?;
            let projects = service.list(client_id)?;
            let names: HashMap<ClientId, String> = ClientService::new(storage)
                .list()?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            let output = format_project_list(&projects, |p| {
                p.client_id.and_then(|id| names.get(&id).cloned())
            });
            println!("{}", output);
        }

        ProjectCommands::Status { project, status } => {
            let status: ProjectStatus = status.parse().map_err(ApuError::Validation)?;
            let found = service
                .find(&project)?
                .ok_or_else(|| ApuError::project_not_found(&project))?;
            let updated = service.set_status(found.id, status)?;
            println!("Project {} is now {}", updated.name, updated.status);
        }

        ProjectCommands::Delete { project } => {
            let found = service
                .find(&project)?
                .ok_or_else(|| ApuError::project_not_found(&project))?;
            service.delete(found.id)?;
            println!("Deleted project: {}", found.name);
        }
    }

    Ok(())
}

fn find_client(storage: &Storage, identifier: &str) -> ApuResult<ClientId> {
    ClientService::new(storage)
        .find(identifier)?
        .map(|c| c.id)
        .ok_or_else(|| ApuError::client_not_found(identifier))
}
