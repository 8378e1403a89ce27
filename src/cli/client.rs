//! Client CLI commands

use clap::Subcommand;

use crate::display::format_client_list;
use crate::error::{ApuError, ApuResult};
use crate::services::{ClientDetails, ClientService};
use crate::storage::Storage;

/// Client subcommands
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a client
    Add {
        /// Client name
        name: String,
        /// Tax identification number
        #[arg(long)]
        tax_id: Option<String>,
        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
        /// Contact phone
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// List clients
    List,
    /// Delete a client without projects
    Delete {
        /// Client name or ID
        client: String,
    },
}

/// Handle a client command
pub fn handle_client_command(storage: &Storage, cmd: ClientCommands) -> ApuResult<()> {
    let service = ClientService::new(storage);

    match cmd {
        ClientCommands::Add {
            name,
            tax_id,
            email,
            phone,
        } => {
            let client = service.create(
                &name,
                ClientDetails {
                    tax_id,
                    email,
                    phone,
                },
            )?;
            println!("Created client: {}", client.name);
            println!("  ID: {}", client.id);
        }

        ClientCommands::List => {
            let clients = service.list()?;
            println!("{}", format_client_list(&clients));
        }

        ClientCommands::Delete { client } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| ApuError::client_not_found(&client))?;
            service.delete(found.id)?;
            println!("Deleted client: {}", found.name);
        }
    }

    Ok(())
}
