//! CLI commands for data export
//!
//! Writes a budget to a file, or to stdout when no file is given.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::error::{ApuError, ApuResult};
use crate::export::{export_budget_csv, export_budget_json, export_budget_yaml};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (lines and summary rows)
    Csv,
    /// JSON format (full budget document)
    Json,
    /// YAML format (full budget document, human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export a budget
    Budget {
        /// Budget name or ID
        budget: String,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> ApuResult<()> {
    match cmd {
        ExportCommands::Budget {
            budget,
            format,
            output,
            pretty,
        } => handle_export_budget(storage, &budget, format, output, pretty),
    }
}

fn handle_export_budget(
    storage: &Storage,
    identifier: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
    pretty: bool,
) -> ApuResult<()> {
    let budget = BudgetService::new(storage)
        .find(identifier)?
        .ok_or_else(|| ApuError::budget_not_found(identifier))?;

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                ApuError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    match format {
        ExportFormat::Csv => export_budget_csv(&budget, &mut writer)?,
        ExportFormat::Json => export_budget_json(storage, &budget, &mut writer, pretty)?,
        ExportFormat::Yaml => export_budget_yaml(storage, &budget, &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| ApuError::Export(e.to_string()))?;

    if let Some(path) = output {
        println!("Budget {} exported to: {}", budget.name, path.display());
    }

    Ok(())
}
