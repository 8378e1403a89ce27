//! Numeric input coercion
//!
//! Every amount in the crate is a `rust_decimal::Decimal`. User input arrives
//! as text (CLI arguments, form fields) or as floats from JSON; both pass
//! through the helpers here, which never fail. Unusable input becomes `None`
//! and the `coerce_*` functions then substitute the documented default.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Hundred, as a decimal
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Parse a decimal from user text
///
/// Accepts "10", "10.50", "-3", "1e3" and tolerates a leading currency sign
/// and `_`/`,` thousands separators ("$1,250.00"). A single `-` may lead;
/// repeated or misplaced signs ("--3", "$-5") and anything else are `None`.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (negative, s) = match s.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, s),
    };
    let s = s.strip_prefix('$').unwrap_or(s);
    // a sign is only accepted in front of the currency symbol
    if !s.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();

    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;

    Some(if negative { -value } else { value })
}

/// Convert a float to a decimal, rejecting NaN and infinities
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Quantity used by the pricer: invalid input counts as zero
///
/// Negative quantities are kept as-is so credit lines price deterministically.
pub fn coerce_quantity(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// Waste percentage used by the pricer: invalid input counts as zero
pub fn coerce_waste(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// Performance divisor used by the pricer
///
/// Missing, zero and negative divisors are clamped to one; a divisor of zero
/// is never handed to a division.
pub fn coerce_performance(value: Option<Decimal>) -> Decimal {
    match value {
        Some(perf) if perf > Decimal::ZERO => perf,
        _ => Decimal::ONE,
    }
}

/// `base × percentage / 100`, or zero if the product overflows
pub fn percent_of(base: Decimal, percentage: Decimal) -> Decimal {
    base.checked_mul(percentage)
        .and_then(|v| v.checked_div(HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Sum decimals, folding any overflow to zero
pub fn checked_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("10"), Some(d("10")));
        assert_eq!(parse_decimal(" 10.50 "), Some(d("10.50")));
        assert_eq!(parse_decimal("-3"), Some(d("-3")));
        assert_eq!(parse_decimal("$1,250.00"), Some(d("1250.00")));
        assert_eq!(parse_decimal("1e3"), Some(d("1000")));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("1.2.3"), None);
        assert_eq!(parse_decimal("--3"), None);
        assert_eq!(parse_decimal("-$-5"), None);
        assert_eq!(parse_decimal("$-5"), None);
        assert_eq!(parse_decimal("-+2"), None);
        assert_eq!(parse_decimal("-"), None);
    }

    #[test]
    fn test_decimal_from_f64() {
        assert_eq!(decimal_from_f64(2.5), Some(d("2.5")));
        assert_eq!(decimal_from_f64(f64::NAN), None);
        assert_eq!(decimal_from_f64(f64::INFINITY), None);
        assert_eq!(decimal_from_f64(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_coerce_defaults() {
        assert_eq!(coerce_quantity(None), Decimal::ZERO);
        assert_eq!(coerce_quantity(Some(d("-2"))), d("-2"));
        assert_eq!(coerce_waste(None), Decimal::ZERO);
        assert_eq!(coerce_waste(Some(d("-5"))), d("-5"));
    }

    #[test]
    fn test_coerce_performance_clamps() {
        assert_eq!(coerce_performance(None), Decimal::ONE);
        assert_eq!(coerce_performance(Some(Decimal::ZERO)), Decimal::ONE);
        assert_eq!(coerce_performance(Some(d("-4"))), Decimal::ONE);
        assert_eq!(coerce_performance(Some(d("2.5"))), d("2.5"));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(d("6200"), d("10")), d("620"));
        assert_eq!(percent_of(d("6200"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(Decimal::MAX, d("50")), Decimal::ZERO);
    }

    #[test]
    fn test_checked_sum_overflow_is_zero() {
        assert_eq!(checked_sum(vec![d("1"), d("2.5")]), d("3.5"));
        assert_eq!(checked_sum(Vec::new()), Decimal::ZERO);
        assert_eq!(checked_sum(vec![Decimal::MAX, Decimal::MAX]), Decimal::ZERO);
    }
}
