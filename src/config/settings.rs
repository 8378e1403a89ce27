//! User settings for APU-CLI
//!
//! Manages display preferences and the defaults applied to new budgets:
//! the seeded indirect costs and the name of the default section.

use serde::{Deserialize, Serialize};

use super::paths::ApuPaths;
use crate::error::ApuError;
use crate::models::{DefaultIndirectCost, IndirectCostRule, DEFAULT_SECTION_NAME};

/// User settings for APU-CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Decimal places used when displaying amounts
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,

    /// Indirect costs seeded on every new budget
    #[serde(default = "default_indirect_costs")]
    pub default_indirect_costs: Vec<IndirectCostRule>,

    /// Name of the protected default section
    #[serde(default = "default_section_name")]
    pub default_section_name: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_indirect_costs() -> Vec<IndirectCostRule> {
    DefaultIndirectCost::all()
        .iter()
        .map(DefaultIndirectCost::to_rule)
        .collect()
}

fn default_section_name() -> String {
    DEFAULT_SECTION_NAME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            decimal_places: default_decimal_places(),
            default_indirect_costs: default_indirect_costs(),
            default_section_name: default_section_name(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &ApuPaths) -> Result<Self, ApuError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| ApuError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ApuError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ApuPaths) -> Result<(), ApuError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ApuError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ApuError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Fresh copies of the default indirect costs with zero amounts
    pub fn indirect_costs_for_new_budget(&self) -> Vec<IndirectCostRule> {
        self.default_indirect_costs
            .iter()
            .map(|rule| IndirectCostRule::new(rule.id.clone(), rule.name.clone(), rule.percentage))
            .collect()
    }
}
