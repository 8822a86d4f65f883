//! Price aggregation and selection for market price views.
//!
//! This crate turns a flat list of price observations into county and
//! commodity lookups, and selects the slice of records a view should show.

pub mod assistant;
pub mod index;
pub mod view;

pub use index::{Buckets, PriceIndex};
pub use view::{select_prices, Selection, ViewMode, ALL};
