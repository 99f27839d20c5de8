use derive_more::Display;
use fill_cost_core::VenueId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Exchange APIs this crate knows how to read order books from.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "cli", value(rename_all = "lower"))]
pub enum VenueKind {
    #[display("binance")]
    Binance,
    #[display("btcturk")]
    Btcturk,
}

impl VenueKind {
    pub const ALL: [VenueKind; 2] = [VenueKind::Binance, VenueKind::Btcturk];

    pub fn id(self) -> VenueId {
        match self {
            VenueKind::Binance => VenueId::new("binance"),
            VenueKind::Btcturk => VenueId::new("btcturk"),
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            VenueKind::Binance => "https://api.binance.com",
            VenueKind::Btcturk => "https://api.btcturk.com",
        }
    }

    /// Order book endpoint path and the query parameter naming the pair.
    pub(crate) fn endpoint(self) -> (&'static str, &'static str) {
        match self {
            VenueKind::Binance => ("/api/v3/depth", "symbol"),
            VenueKind::Btcturk => ("/api/v2/orderbook", "pairSymbol"),
        }
    }
}

/// One venue to fetch from.
#[derive(Validate, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Name the venue is reported under
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    pub kind: VenueKind,
    #[validate(url)]
    pub base_url: String,
    /// Pair symbol to use instead of the one passed to `fetch`
    #[validate(length(min = 1))]
    pub symbol: Option<String>,
}

impl VenueConfig {
    /// The public production endpoint for `kind`, reported under its own name.
    pub fn for_kind(kind: VenueKind) -> Self {
        VenueConfig {
            id: kind.id().to_string(),
            kind,
            base_url: kind.default_base_url().to_string(),
            symbol: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn venue_id(&self) -> VenueId {
        VenueId::from(self.id.as_str())
    }
}

/// Everything the HTTP source needs.
#[derive(Validate, Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    #[validate(range(min = 1, max = 120))]
    pub timeout_secs: u64,
    #[validate(length(min = 1), nested)]
    pub venues: Vec<VenueConfig>,
}

impl SourceSettings {
    pub fn new(venues: Vec<VenueConfig>) -> Self {
        SourceSettings {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            venues,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings::new(VenueKind::ALL.into_iter().map(VenueConfig::for_kind).collect())
    }
}
