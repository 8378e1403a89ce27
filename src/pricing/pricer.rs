//! Line-item pricer
//!
//! Computes the extended cost of one line under the rule its category
//! selects:
//!
//! | Category            | Total                              |
//! |---------------------|------------------------------------|
//! | materials           | `q × p × (1 + waste / 100)`        |
//! | labor, equipment    | `(q × p) / performance`            |
//! | transport           | `q × p`                            |
//!
//! The pricer never fails. Overflow folds to zero and a performance divisor
//! that is not strictly positive is replaced by one.

use rust_decimal::Decimal;

use crate::models::numeric::{coerce_performance, coerce_quantity, coerce_waste, HUNDRED};
use crate::models::{Adjustment, ResourceCategory};

/// Price a line from its snapshot price, quantity and adjustment
pub fn price(unit_price: Decimal, quantity: Decimal, adjustment: &Adjustment) -> Decimal {
    let base = match quantity.checked_mul(unit_price) {
        Some(base) => base,
        None => return Decimal::ZERO,
    };

    let total = match adjustment {
        Adjustment::Materials { waste_percentage } => waste_factor(*waste_percentage)
            .and_then(|factor| base.checked_mul(factor)),
        Adjustment::Labor { performance } | Adjustment::Equipment { performance } => {
            base.checked_div(coerce_performance(Some(*performance)))
        }
        Adjustment::Transport => Some(base),
    };

    total.unwrap_or(Decimal::ZERO)
}

/// Price a line from raw, possibly missing inputs
///
/// Missing values take their category defaults: quantity 0, waste 0,
/// performance 1. Factors that do not apply to `category` are ignored.
pub fn price_raw(
    unit_price: Decimal,
    quantity: Option<Decimal>,
    category: ResourceCategory,
    waste_percentage: Option<Decimal>,
    performance: Option<Decimal>,
) -> Decimal {
    let adjustment = match category {
        ResourceCategory::Materials => Adjustment::Materials {
            waste_percentage: coerce_waste(waste_percentage),
        },
        ResourceCategory::Labor => Adjustment::Labor {
            performance: coerce_performance(performance),
        },
        ResourceCategory::Equipment => Adjustment::Equipment {
            performance: coerce_performance(performance),
        },
        ResourceCategory::Transport => Adjustment::Transport,
    };

    price(unit_price, coerce_quantity(quantity), &adjustment)
}

fn waste_factor(waste_percentage: Decimal) -> Option<Decimal> {
    waste_percentage
        .checked_div(HUNDRED)
        .and_then(|w| Decimal::ONE.checked_add(w))
}
