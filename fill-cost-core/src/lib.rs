//! # Fill Cost Core
//!
//! Estimates what it costs to buy an amount of a base asset by walking the ask
//! side of an order book, and ranks venues by the effective unit price of that
//! purchase.
//!
//! The fill walk and the comparison are pure; fetching books goes through the
//! [`OrderBookSource`] trait, fanned out concurrently by [`compare_venues`].
//!
//! ## Example
//!
//! ```rust
//! use fill_cost_core::{compare, FillRequest, PriceLevel, VenueId};
//! use rust_decimal::Decimal;
//! use std::collections::BTreeMap;
//!
//! let level = |p: i64, q: i64| PriceLevel::new(Decimal::from(p), Decimal::from(q));
//! let venues = BTreeMap::from([
//!     (VenueId::new("a"), vec![level(100, 1), level(101, 1)]),
//!     (VenueId::new("b"), vec![level(99, 2)]),
//! ]);
//!
//! let request = FillRequest::new(Decimal::from(2), false);
//! let result = compare(&request, &venues).unwrap();
//! assert_eq!(result.best_venue, VenueId::new("b"));
//! assert_eq!(result.best().unwrap().fill.quote_cost, Decimal::from(198));
//! ```

pub mod comparator;
pub mod error;
pub mod fill;
pub mod source;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;
mod units;
pub use comparator::compare;
pub use error::{ComparisonError, ErrorKind, FillError, SourceError};
pub use fill::{compute_fill, total_depth};
pub use source::{compare_venues, OrderBookSnapshot, OrderBookSource, RawLevel, StaticOrderBookSource};
pub use types::{ComparisonResult, FillRequest, FillResult, PriceLevel, VenueId, VenueQuote};
pub use units::{format_amount, parse_decimal, round8, spread_percent, OUTPUT_DECIMALS};
