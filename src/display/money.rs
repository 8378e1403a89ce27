//! Amount formatting
//!
//! Amounts are kept at full precision everywhere else; rounding happens
//! only here, for display.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::Settings;

/// Currency symbol and precision used for terminal output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub symbol: String,
    pub decimal_places: u32,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            decimal_places: 2,
        }
    }
}

impl From<&Settings> for MoneyFormat {
    fn from(settings: &Settings) -> Self {
        Self {
            symbol: settings.currency_symbol.clone(),
            decimal_places: settings.decimal_places,
        }
    }
}

impl MoneyFormat {
    /// Format an amount, e.g. `-$1234.50`
    pub fn amount(&self, value: Decimal) -> String {
        let rounded = self.round(value);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{}{}", self.symbol, self.fixed(rounded.abs()))
        } else {
            format!("{}{}", self.symbol, self.fixed(rounded.abs()))
        }
    }

    /// Format a plain number at display precision (quantities, unit prices)
    pub fn number(&self, value: Decimal) -> String {
        self.fixed(self.round(value))
    }

    fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero)
    }

    fn fixed(&self, value: Decimal) -> String {
        format!("{:.*}", self.decimal_places as usize, value)
    }
}

/// Format a percentage without trailing zeros, e.g. `12.5%`
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.normalize())
}
