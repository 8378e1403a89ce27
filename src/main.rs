use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use apu::cli::{
    handle_analysis_command, handle_budget_command, handle_catalog_command, handle_client_command,
    handle_export_command, handle_price_command, handle_project_command,
};
use apu::audit::{AuditFilter, EntityType};
use apu::config::{paths::ApuPaths, settings::Settings};
use apu::display::format_percent;
use apu::storage::init::{initialize_storage, needs_initialization};
use apu::storage::Storage;

#[derive(Parser)]
#[command(
    name = "apu",
    version,
    about = "Unit-price analysis and construction budgeting",
    long_about = "APU-CLI prices construction work from a supply catalog. Build unit-price \
                  analyses (APUs) from materials, equipment, labor and transport, and roll \
                  them up into sectioned project budgets with indirect-cost markups."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and starter catalog
    Init,

    /// Show current configuration and paths
    Config,

    /// Price a single line without storing anything
    Price(apu::cli::PriceArgs),

    /// Supply catalog commands
    #[command(subcommand)]
    Catalog(apu::cli::CatalogCommands),

    /// Client management commands
    #[command(subcommand)]
    Client(apu::cli::ClientCommands),

    /// Project management commands
    #[command(subcommand)]
    Project(apu::cli::ProjectCommands),

    /// Unit-price analysis commands
    #[command(subcommand, alias = "apu")]
    Analysis(apu::cli::AnalysisCommands),

    /// Budget commands
    #[command(subcommand)]
    Budget(apu::cli::BudgetCommands),

    /// Export data
    #[command(subcommand)]
    Export(apu::cli::ExportCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,

        /// Only show one kind of record
        #[arg(short, long, value_enum)]
        entity: Option<EntityType>,

        /// Only show records whose ID starts with this (e.g. bud-1a2b)
        #[arg(long)]
        id: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = ApuPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(Commands::Init) => {
            println!("Initializing APU-CLI at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("A starter catalog of materials, equipment, labor and transport was created.");
            println!("Run 'apu catalog list' to see it.");
            return Ok(());
        }
        Some(Commands::Config) => {
            println!("APU-CLI Configuration");
            println!("=====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Decimal places:  {}", settings.decimal_places);
            println!("  Default section: {}", settings.default_section_name);
            println!("  Default indirect costs:");
            for rule in &settings.default_indirect_costs {
                println!("    {} ({}): {}", rule.name, rule.id, format_percent(rule.percentage));
            }
            return Ok(());
        }
        Some(Commands::Price(args)) => {
            handle_price_command(&settings, args)?;
            return Ok(());
        }
        Some(command) => command,
        None => {
            println!("APU-CLI - Unit-price analysis and construction budgeting");
            println!();
            println!("Run 'apu --help' for usage information.");
            println!("Run 'apu init' to get started.");
            return Ok(());
        }
    };

    if needs_initialization(&paths) {
        bail!("APU-CLI is not initialized. Run 'apu init' first.");
    }

    // Initialize storage
    let storage = Storage::new(paths)?;
    storage.load_all()?;

    match command {
        Commands::Catalog(cmd) => handle_catalog_command(&storage, &settings, cmd)?,
        Commands::Client(cmd) => handle_client_command(&storage, cmd)?,
        Commands::Project(cmd) => handle_project_command(&storage, cmd)?,
        Commands::Analysis(cmd) => handle_analysis_command(&storage, &settings, cmd)?,
        Commands::Budget(cmd) => handle_budget_command(&storage, &settings, cmd)?,
        Commands::Export(cmd) => handle_export_command(&storage, cmd)?,
        Commands::Audit { count, entity, id } => {
            let filter = AuditFilter {
                entity_type: entity,
                entity_id: id,
            };
            let entries = storage.audit().read_recent(count, &filter)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Commands::Init | Commands::Config | Commands::Price(_) => {}
    }

    Ok(())
}
