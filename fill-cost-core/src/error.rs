use crate::types::VenueId;
use derive_more::Display;
use rust_decimal::Decimal;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of a single fill walk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FillError {
    #[error("invalid target amount {amount:?}: must be a positive number")]
    InvalidAmount { amount: String },

    #[error("insufficient liquidity: requested {requested}, only {available} available")]
    InsufficientLiquidity {
        requested: Decimal,
        available: Decimal,
    },

    #[error("cost overflowed the decimal range {context}")]
    Overflow { context: String },
}

/// Failures of an order book source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to fetch order book from {venue}: {message}")]
    Fetch {
        venue: VenueId,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("invalid order book from {venue}: {reason}")]
    Validation { venue: VenueId, reason: String },

    #[error("unknown venue {0}")]
    UnknownVenue(VenueId),
}

impl SourceError {
    pub fn fetch(venue: VenueId, message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        SourceError::Fetch {
            venue,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn validation(venue: VenueId, reason: impl Into<String>) -> Self {
        SourceError::Validation {
            venue,
            reason: reason.into(),
        }
    }

    pub fn venue(&self) -> &VenueId {
        match self {
            SourceError::Fetch { venue, .. }
            | SourceError::Validation { venue, .. }
            | SourceError::UnknownVenue(venue) => venue,
        }
    }
}

/// The single error type surfaced by a comparison. Wrapped failures stay
/// reachable through [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("comparison failed: {0}")]
    InvalidAmount(#[source] FillError),

    #[error("comparison failed: no venues to compare")]
    NoVenues,

    #[error("comparison failed at {venue}: {source}")]
    Fill {
        venue: VenueId,
        #[source]
        source: FillError,
    },

    #[error(
        "comparison failed: no liquidity at {} ({} of {} venues filled nothing)",
        join_venues(.venues),
        .venues.len(),
        .total
    )]
    ZeroLiquidity { venues: Vec<VenueId>, total: usize },

    #[error("comparison failed: {0}")]
    Source(#[from] SourceError),
}

fn join_venues(venues: &[VenueId]) -> String {
    venues
        .iter()
        .map(VenueId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flat classification of a [`ComparisonError`] by where it started.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAmount,
    InsufficientLiquidity,
    ZeroLiquidity,
    NoVenues,
    FetchError,
    ValidationError,
}

impl ComparisonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ComparisonError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            ComparisonError::NoVenues => ErrorKind::NoVenues,
            ComparisonError::Fill { source, .. } => match source {
                FillError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
                FillError::InsufficientLiquidity { .. } => ErrorKind::InsufficientLiquidity,
                FillError::Overflow { .. } => ErrorKind::ValidationError,
            },
            ComparisonError::ZeroLiquidity { .. } => ErrorKind::ZeroLiquidity,
            ComparisonError::Source(SourceError::Fetch { .. }) => ErrorKind::FetchError,
            ComparisonError::Source(_) => ErrorKind::ValidationError,
        }
    }

    /// True when every compared venue filled nothing: an empty but not
    /// failed comparison.
    pub fn is_total_illiquidity(&self) -> bool {
        matches!(self, ComparisonError::ZeroLiquidity { venues, total } if venues.len() == *total)
    }
}
