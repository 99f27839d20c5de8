use crate::error::{ComparisonError, FillError};
use crate::fill::compute_fill;
use crate::types::{ComparisonResult, FillRequest, FillResult, PriceLevel, VenueId, VenueQuote};
use crate::units::{round8, spread_percent};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// Prices `request` against every venue's asks and ranks the venues by
/// effective unit price, cheapest first.
///
/// The spread compares the best venue with the runner-up; with a single venue
/// there is nothing to compare against and `spread_percent` is `None`. Venues
/// with equal unit prices keep the map's (venue id) order.
///
/// # Errors
///
/// Fails without a partial ranking when the amount is not positive, when
/// `venues` is empty, when any venue's fill fails, or when any venue fills
/// nothing at all ([`ComparisonError::ZeroLiquidity`] lists every such venue).
pub fn compare(
    request: &FillRequest,
    venues: &BTreeMap<VenueId, Vec<PriceLevel>>,
) -> Result<ComparisonResult, ComparisonError> {
    request.validate().map_err(ComparisonError::InvalidAmount)?;
    if venues.is_empty() {
        return Err(ComparisonError::NoVenues);
    }

    let mut fills = Vec::with_capacity(venues.len());
    for (venue, asks) in venues {
        let fill = compute_fill(asks, request).map_err(|source| ComparisonError::Fill {
            venue: venue.clone(),
            source,
        })?;
        debug!(%venue, levels = asks.len(), %fill, "computed fill");
        fills.push((venue.clone(), fill));
    }

    let empty: Vec<VenueId> = fills
        .iter()
        .filter(|(_, fill)| fill.is_empty())
        .map(|(venue, _)| venue.clone())
        .collect();
    if !empty.is_empty() {
        return Err(ComparisonError::ZeroLiquidity {
            venues: empty,
            total: fills.len(),
        });
    }

    rank(*request, fills)
}

/// Orders non-empty fills by unit price. Unit prices are compared unrounded
/// and rounded to 8 places only in the returned quotes.
fn rank(
    request: FillRequest,
    fills: Vec<(VenueId, FillResult)>,
) -> Result<ComparisonResult, ComparisonError> {
    let mut priced: Vec<(VenueId, Decimal, FillResult)> = fills
        .into_iter()
        .map(|(venue, fill)| match fill.quote_cost.checked_div(fill.filled_amount) {
            Some(unit_price) => Ok((venue, unit_price, fill)),
            None => Err(ComparisonError::Fill {
                venue,
                source: FillError::Overflow {
                    context: format!(
                        "pricing {} per unit over {} filled",
                        fill.quote_cost, fill.filled_amount
                    ),
                },
            }),
        })
        .collect::<Result<_, _>>()?;
    // stable: ties keep venue order
    priced.sort_by(|a, b| a.1.cmp(&b.1));

    let spread = match priced.as_slice() {
        [(_, best, _), (_, runner_up, _), ..] => spread_percent(*best, *runner_up),
        _ => None,
    };

    let quotes: Vec<VenueQuote> = priced
        .into_iter()
        .enumerate()
        .map(|(index, (venue, unit_price, fill))| VenueQuote {
            venue,
            rank: index + 1,
            price_per_unit: round8(unit_price),
            fill,
        })
        .collect();
    let best_venue = quotes[0].venue.clone();
    debug!(%best_venue, spread = ?spread, venues = quotes.len(), "ranked venues");

    Ok(ComparisonResult {
        request,
        quotes,
        best_venue,
        spread_percent: spread,
    })
}
