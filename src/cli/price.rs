//! Quick line pricing without touching stored data

use clap::Args;
use rust_decimal::Decimal;

use crate::config::Settings;
use crate::display::MoneyFormat;
use crate::error::ApuResult;
use crate::models::numeric::parse_decimal;
use crate::pricing::price_raw;

use super::lines::parse_category;

/// Arguments of the `price` command
#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Unit price of the resource
    #[arg(allow_hyphen_values = true)]
    pub unit_price: String,

    /// Quantity consumed
    #[arg(allow_hyphen_values = true)]
    pub quantity: String,

    /// Category (materials, equipment, labor, transport)
    #[arg(short, long)]
    pub category: String,

    /// Waste percentage (materials only)
    #[arg(short, long, allow_hyphen_values = true)]
    pub waste: Option<String>,

    /// Performance divisor (labor and equipment only)
    #[arg(short, long, allow_hyphen_values = true)]
    pub performance: Option<String>,
}

/// Price a single line and print its total
pub fn handle_price_command(settings: &Settings, args: PriceArgs) -> ApuResult<()> {
    let category = parse_category(&args.category)?;
    let total = price_raw(
        parse_decimal(&args.unit_price).unwrap_or(Decimal::ZERO),
        parse_decimal(&args.quantity),
        category,
        args.waste.as_deref().and_then(parse_decimal),
        args.performance.as_deref().and_then(parse_decimal),
    );

    println!("{}", MoneyFormat::from(settings).amount(total));
    Ok(())
}
