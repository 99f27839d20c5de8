//! # Fill Cost Venues
//!
//! [`OrderBookSource`](fill_cost_core::OrderBookSource) implementations backed
//! by exchange REST APIs.
//!
//! Supported venues are listed in [`VenueKind`]; each one is configured with a
//! [`VenueConfig`] and validated before any request is made.

mod client;
pub mod error;
mod responses;
pub mod venue;
pub use client::HttpOrderBookSource;
pub use error::VenueConfigError;
pub use venue::{SourceSettings, VenueConfig, VenueKind, DEFAULT_TIMEOUT};
