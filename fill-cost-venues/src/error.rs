use fill_cost_core::VenueId;
use thiserror::Error;

/// Problems building an [`crate::HttpOrderBookSource`] from settings.
#[derive(Error, Debug)]
pub enum VenueConfigError {
    #[error("invalid venue settings: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("venue {0} is configured more than once")]
    DuplicateVenue(VenueId),
}
