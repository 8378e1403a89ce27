//! Pricing core
//!
//! The two calculation components of the crate and the state that keeps
//! them current:
//!
//! - [`pricer`]: extended cost of a single line under its category rule
//! - [`rollup`]: direct, indirect and grand totals plus category/section groups
//! - [`worksheet`]: an editable collection that recomputes on every change
//! - [`events`]: typed catalog change notifications

pub mod events;
pub mod pricer;
pub mod rollup;
pub mod worksheet;

pub use events::{CatalogEvent, CatalogNotifier};
pub use pricer::{price, price_raw};
pub use rollup::{
    compute_aggregate, group_by_category, group_by_section, BudgetAggregate, CategoryGroup,
    SectionGroup,
};
pub use worksheet::{EditState, Worksheet};
