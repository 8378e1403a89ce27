//! Indirect cost rules
//!
//! An indirect cost is a named percentage markup over the direct cost total
//! (administration, contingency, profit). The amount is derived: it is
//! filled in by the aggregator and overwritten on every recomputation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric::percent_of;

/// A named percentage markup applied to the direct-cost total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectCostRule {
    /// Stable identifier (e.g., "administration")
    pub id: String,

    /// Display name
    pub name: String,

    /// Percentage of the direct total (0-100 by convention, not enforced)
    pub percentage: Decimal,

    /// Computed amount
    #[serde(default)]
    pub amount: Decimal,
}

impl IndirectCostRule {
    /// Create a rule with a zero amount
    pub fn new(id: impl Into<String>, name: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            percentage,
            amount: Decimal::ZERO,
        }
    }

    /// Amount this rule yields over a direct total
    pub fn amount_for(&self, direct_total: Decimal) -> Decimal {
        percent_of(direct_total, self.percentage)
    }

    /// Whether the percentage lies in the conventional 0-100 range
    pub fn is_conventional(&self) -> bool {
        self.percentage >= Decimal::ZERO && self.percentage <= Decimal::ONE_HUNDRED
    }
}

impl fmt::Display for IndirectCostRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.name, self.percentage.normalize())
    }
}

/// Indirect costs seeded on every new budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultIndirectCost {
    Administration,
    Contingency,
    Profit,
}

impl DefaultIndirectCost {
    /// All seeded indirect costs in order
    pub fn all() -> &'static [Self] {
        &[Self::Administration, Self::Contingency, Self::Profit]
    }

    /// Rule identifier
    pub fn id(&self) -> &'static str {
        match self {
            Self::Administration => "administration",
            Self::Contingency => "contingency",
            Self::Profit => "profit",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Administration => "Administration",
            Self::Contingency => "Contingency",
            Self::Profit => "Profit",
        }
    }

    /// Default percentage
    pub fn percentage(&self) -> Decimal {
        match self {
            Self::Administration => Decimal::from(10),
            Self::Contingency => Decimal::from(5),
            Self::Profit => Decimal::from(15),
        }
    }

    /// Create the rule for this default
    pub fn to_rule(&self) -> IndirectCostRule {
        IndirectCostRule::new(self.id(), self.name(), self.percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_for() {
        let rule = IndirectCostRule::new("administration", "Administration", Decimal::from(10));
        assert_eq!(rule.amount_for(Decimal::from(6200)), Decimal::from(620));
        assert_eq!(rule.amount_for(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_conventional_range() {
        let mut rule = IndirectCostRule::new("x", "X", Decimal::from(100));
        assert!(rule.is_conventional());
        rule.percentage = Decimal::from(120);
        assert!(!rule.is_conventional());
    }

    #[test]
    fn test_defaults() {
        let rules: Vec<_> = DefaultIndirectCost::all().iter().map(|d| d.to_rule()).collect();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].id, "administration");
        assert_eq!(rules[2].percentage, Decimal::from(15));
        assert_eq!(rules[1].to_string(), "Contingency (5%)");
    }
}
