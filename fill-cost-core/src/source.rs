use crate::comparator::compare;
use crate::error::{ComparisonError, SourceError};
use crate::types::{ComparisonResult, FillRequest, PriceLevel, VenueId};
use crate::units::parse_decimal;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

/// A `(price, quantity)` pair exactly as the venue sent it.
pub type RawLevel = (String, String);

/// One venue's order book as fetched, before number parsing.
///
/// Asks are expected ascending by price and bids descending. Either side may be
/// missing; a book missing both is rejected by the source that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    #[serde(default)]
    pub asks: Option<Vec<RawLevel>>,
    #[serde(default)]
    pub bids: Option<Vec<RawLevel>>,
}

impl OrderBookSnapshot {
    pub fn new(asks: Vec<RawLevel>, bids: Vec<RawLevel>) -> Self {
        OrderBookSnapshot {
            asks: Some(asks),
            bids: Some(bids),
        }
    }

    /// Parses the ask side into price levels for the fill walk.
    ///
    /// A missing ask side is an empty book. Unparseable or negative numbers and
    /// asks that are not in ascending price order are rejected.
    pub fn ask_levels(&self, venue: &VenueId) -> Result<Vec<PriceLevel>, SourceError> {
        let asks = self.asks.as_deref().unwrap_or_default();
        let mut levels = Vec::with_capacity(asks.len());
        for (index, (price, quantity)) in asks.iter().enumerate() {
            let level = PriceLevel::new(
                parse_level_value(venue, index, "price", price)?,
                parse_level_value(venue, index, "quantity", quantity)?,
            );
            if let Some(previous) = levels.last().map(|l: &PriceLevel| l.price) {
                if level.price < previous {
                    return Err(SourceError::validation(
                        venue.clone(),
                        format!(
                            "ask {index} price {} is below the previous ask {previous}; asks must be ascending",
                            level.price
                        ),
                    ));
                }
            }
            levels.push(level);
        }
        Ok(levels)
    }
}

fn parse_level_value(
    venue: &VenueId,
    index: usize,
    field: &str,
    text: &str,
) -> Result<rust_decimal::Decimal, SourceError> {
    match parse_decimal(text) {
        Some(value) if value.is_sign_negative() && !value.is_zero() => Err(SourceError::validation(
            venue.clone(),
            format!("ask {index} has negative {field} {text:?}"),
        )),
        Some(value) => Ok(value),
        None => Err(SourceError::validation(
            venue.clone(),
            format!("ask {index} has unparseable {field} {text:?}"),
        )),
    }
}

/// Where order books come from: an exchange API, a file, or memory.
#[async_trait]
pub trait OrderBookSource: Send + Sync {
    /// Fetches at most `depth` levels per side of `symbol` at `venue`.
    async fn fetch(
        &self,
        venue: &VenueId,
        symbol: &str,
        depth: u32,
    ) -> Result<OrderBookSnapshot, SourceError>;
}

/// Serves fixed snapshots keyed by venue. Unknown venues fail with
/// [`SourceError::UnknownVenue`].
#[derive(Debug, Clone, Default)]
pub struct StaticOrderBookSource {
    books: HashMap<VenueId, OrderBookSnapshot>,
}

impl StaticOrderBookSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, venue: VenueId, book: OrderBookSnapshot) -> Self {
        self.insert(venue, book);
        self
    }

    pub fn insert(&mut self, venue: VenueId, book: OrderBookSnapshot) {
        self.books.insert(venue, book);
    }

    pub fn venues(&self) -> Vec<VenueId> {
        let mut venues: Vec<VenueId> = self.books.keys().cloned().collect();
        venues.sort();
        venues
    }
}

impl FromIterator<(VenueId, OrderBookSnapshot)> for StaticOrderBookSource {
    fn from_iter<I: IntoIterator<Item = (VenueId, OrderBookSnapshot)>>(iter: I) -> Self {
        StaticOrderBookSource {
            books: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl OrderBookSource for StaticOrderBookSource {
    async fn fetch(
        &self,
        venue: &VenueId,
        _symbol: &str,
        depth: u32,
    ) -> Result<OrderBookSnapshot, SourceError> {
        let book = self
            .books
            .get(venue)
            .ok_or_else(|| SourceError::UnknownVenue(venue.clone()))?;
        let depth = depth as usize;
        Ok(OrderBookSnapshot {
            asks: book.asks.as_ref().map(|a| a.iter().take(depth).cloned().collect()),
            bids: book.bids.as_ref().map(|b| b.iter().take(depth).cloned().collect()),
        })
    }
}

/// Fetches every venue's book concurrently and compares them.
///
/// The request is validated before anything is fetched. All fetches must
/// succeed: the first fetch or validation failure aborts the comparison and no
/// partial ranking is produced.
pub async fn compare_venues<S>(
    source: &S,
    venues: &[VenueId],
    symbol: &str,
    depth: u32,
    request: &FillRequest,
) -> Result<ComparisonResult, ComparisonError>
where
    S: OrderBookSource + ?Sized,
{
    request.validate().map_err(ComparisonError::InvalidAmount)?;
    if venues.is_empty() {
        return Err(ComparisonError::NoVenues);
    }

    let fetches = venues.iter().map(|venue| async move {
        let snapshot = source.fetch(venue, symbol, depth).await.map_err(|e| {
            warn!(%venue, error = %e, "order book fetch failed");
            e
        })?;
        let asks = snapshot.ask_levels(venue).map_err(|e| {
            warn!(%venue, error = %e, "order book rejected");
            e
        })?;
        info!(%venue, symbol, asks = asks.len(), "fetched order book");
        Ok::<_, SourceError>((venue.clone(), asks))
    });
    let books: BTreeMap<VenueId, Vec<PriceLevel>> = try_join_all(fetches).await?.into_iter().collect();

    compare(request, &books)
}
