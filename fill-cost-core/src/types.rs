use crate::error::FillError;
use crate::units::parse_decimal;
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Identifier of a trading venue, e.g. `binance`.
#[derive(Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display("{}", _0)]
#[serde(transparent)]
pub struct VenueId(Cow<'static, str>);

impl VenueId {
    pub const fn new(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VenueId {
    fn from(id: &str) -> Self {
        Self(Cow::Owned(id.to_owned()))
    }
}

impl From<String> for VenueId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

/// A single ask (or bid) level: `quantity` units offered at `price`.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[display("{} @ {}", quantity, price)]
pub struct PriceLevel {
    /// Quote currency per unit of base asset
    pub price: Decimal,
    /// Base asset available at this price
    pub quantity: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        PriceLevel { price, quantity }
    }
}

/// How much base asset to acquire and whether a partial fill is acceptable.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[display("{} (allow partial: {})", target_amount, allow_partial)]
pub struct FillRequest {
    pub target_amount: Decimal,
    pub allow_partial: bool,
}

impl FillRequest {
    /// Creates a request without validating the amount; the comparator and
    /// calculator reject non-positive amounts before walking any levels.
    pub fn new(target_amount: Decimal, allow_partial: bool) -> Self {
        FillRequest {
            target_amount,
            allow_partial,
        }
    }

    /// Parses a user supplied amount such as `"0.001"` or `"1e-3"`.
    pub fn parse(amount: &str, allow_partial: bool) -> Result<Self, FillError> {
        let target_amount = parse_decimal(amount).ok_or_else(|| FillError::InvalidAmount {
            amount: amount.to_string(),
        })?;
        let request = FillRequest::new(target_amount, allow_partial);
        request.validate()?;
        Ok(request)
    }

    /// Fails with [`FillError::InvalidAmount`] unless the target is positive.
    pub fn validate(&self) -> Result<(), FillError> {
        if self.target_amount > Decimal::ZERO {
            Ok(())
        } else {
            Err(FillError::InvalidAmount {
                amount: self.target_amount.to_string(),
            })
        }
    }
}

/// Outcome of walking one venue's asks. All amounts are rounded to 8 places.
///
/// `filled_amount + unfilled_amount` equals the requested target.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[display(
    "cost {} for {} filled ({} unfilled{})",
    quote_cost,
    filled_amount,
    unfilled_amount,
    if *is_partial { ", partial" } else { "" }
)]
pub struct FillResult {
    pub quote_cost: Decimal,
    pub filled_amount: Decimal,
    pub unfilled_amount: Decimal,
    pub is_partial: bool,
}

impl FillResult {
    /// True when nothing at all could be filled.
    pub fn is_empty(&self) -> bool {
        self.filled_amount.is_zero()
    }
}

/// One venue's fill, with the effective unit price it implies.
#[derive(Display, Debug, Clone, PartialEq, Eq, Serialize)]
#[display("#{} {}: {} per unit", rank, venue, price_per_unit)]
pub struct VenueQuote {
    pub venue: VenueId,
    /// 1 is the cheapest venue
    pub rank: usize,
    pub price_per_unit: Decimal,
    pub fill: FillResult,
}

/// Venues ranked cheapest first, with the best venue and the spread to the
/// runner-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub request: FillRequest,
    pub quotes: Vec<VenueQuote>,
    pub best_venue: VenueId,
    /// `None` when only one venue was compared
    pub spread_percent: Option<Decimal>,
}

impl ComparisonResult {
    pub fn best(&self) -> Option<&VenueQuote> {
        self.quotes.first()
    }

    pub fn runner_up(&self) -> Option<&VenueQuote> {
        self.quotes.get(1)
    }

    pub fn quote(&self, venue: &VenueId) -> Option<&VenueQuote> {
        self.quotes.iter().find(|q| &q.venue == venue)
    }
}
