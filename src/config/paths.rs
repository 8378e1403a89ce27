//! Path management for APU-CLI
//!
//! ## Path Resolution Order
//!
//! 1. `APU_CLI_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory for `apu-cli`
//!    (`~/.config/apu-cli` on Linux, `%APPDATA%\apu-cli` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::ApuError;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "APU_CLI_DATA_DIR";

/// Manages all paths used by APU-CLI
#[derive(Debug, Clone)]
pub struct ApuPaths {
    base_dir: PathBuf,
}

impl ApuPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, ApuError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create ApuPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to catalog.json
    pub fn catalog_file(&self) -> PathBuf {
        self.data_dir().join("catalog.json")
    }

    /// Get the path to clients.json
    pub fn clients_file(&self) -> PathBuf {
        self.data_dir().join("clients.json")
    }

    /// Get the path to projects.json
    pub fn projects_file(&self) -> PathBuf {
        self.data_dir().join("projects.json")
    }

    /// Get the path to analyses.json
    pub fn analyses_file(&self) -> PathBuf {
        self.data_dir().join("analyses.json")
    }

    /// Get the path to budgets.json
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), ApuError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ApuError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| ApuError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if APU-CLI has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, ApuError> {
    ProjectDirs::from("", "", "apu-cli")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ApuError::Config("Could not determine home directory".into()))
}
