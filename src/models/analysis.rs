//! Unit-price analysis (APU) model
//!
//! An analysis prices one unit of work (e.g., "1 m3 of concrete") from the
//! resources it consumes. Its grand total is the unit price of that work.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AnalysisId;
use crate::pricing::Worksheet;

/// A unit-price analysis record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Unique identifier
    pub id: AnalysisId,

    /// Item code (e.g., "02.01")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Description of the unit of work
    pub description: String,

    /// Unit the analysis prices (e.g., "m3")
    pub unit: String,

    /// Priced resource lines
    pub worksheet: Worksheet,

    /// When the analysis was created
    pub created_at: DateTime<Utc>,

    /// When the analysis was last modified
    pub updated_at: DateTime<Utc>,
}

impl Analysis {
    /// Create a new, empty analysis
    pub fn new(description: impl Into<String>, unit: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: AnalysisId::new(),
            code: None,
            description: description.into(),
            unit: unit.into(),
            worksheet: Worksheet::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the item code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Unit price of the analysed work
    pub fn unit_price(&self) -> Decimal {
        self.worksheet.grand_total()
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Analysis description cannot be empty".into());
        }
        if self.unit.trim().is_empty() {
            return Err("Analysis unit cannot be empty".into());
        }
        Ok(())
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} {} ({})", code, self.description, self.unit),
            None => write!(f, "{} ({})", self.description, self.unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, LineItem, ResourceCategory};
    use crate::pricing::EditState;

    #[test]
    fn test_new_analysis() {
        let analysis = Analysis::new("Concrete f'c 210", "m3").with_code("02.01");
        assert_eq!(analysis.to_string(), "02.01 Concrete f'c 210 (m3)");
        assert_eq!(analysis.worksheet.state(), EditState::Empty);
        assert_eq!(analysis.unit_price(), Decimal::ZERO);
    }

    #[test]
    fn test_unit_price_tracks_worksheet() {
        let mut analysis = Analysis::new("Plaster", "m2");
        let sand = CatalogItem::new(1, "Sand", "m3", Decimal::from(40), ResourceCategory::Materials);
        analysis
            .worksheet
            .add_line(LineItem::from_catalog(&sand).with_quantity(Decimal::from(2)))
            .unwrap();
        assert_eq!(analysis.unit_price(), Decimal::from(80));
    }

    #[test]
    fn test_validation() {
        assert!(Analysis::new("", "m3").validate().is_err());
        assert!(Analysis::new("Wall", " ").validate().is_err());
        assert!(Analysis::new("Wall", "m2").validate().is_ok());
    }

    #[test]
    fn test_round_trip_loads_saved() {
        let analysis = Analysis::new("Wall", "m2");
        let json = serde_json::to_string(&analysis).unwrap();
        let loaded: Analysis = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.id, analysis.id);
        assert_eq!(loaded.worksheet.state(), EditState::Saved);
    }
}
