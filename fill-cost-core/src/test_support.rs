#![cfg(test)]

use crate::types::{PriceLevel, VenueId};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

pub(crate) fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

/// Builds ask levels from `(price, quantity)` text pairs.
pub(crate) fn levels(pairs: &[(&str, &str)]) -> Vec<PriceLevel> {
    pairs
        .iter()
        .map(|(price, quantity)| PriceLevel::new(dec(price), dec(quantity)))
        .collect()
}

pub(crate) fn venue_a() -> VenueId {
    VenueId::new("venue-a")
}

pub(crate) fn venue_b() -> VenueId {
    VenueId::new("venue-b")
}

/// Asks captured from two venues for BTC/USDT.
pub(crate) fn reference_books() -> BTreeMap<VenueId, Vec<PriceLevel>> {
    BTreeMap::from([
        (
            venue_a(),
            levels(&[
                ("85813.59", "0.05105"),
                ("85814.00", "0.02500"),
                ("85820.00", "0.10000"),
            ]),
        ),
        (
            venue_b(),
            levels(&[
                ("85757", "0.02330"),
                ("85758", "0.02330"),
                ("85761", "0.01000"),
            ]),
        ),
    ])
}

/// Small books where the cheaper venue has a single deep level.
pub(crate) fn two_level_books() -> BTreeMap<VenueId, Vec<PriceLevel>> {
    BTreeMap::from([
        (venue_a(), levels(&[("100", "1"), ("101", "1")])),
        (venue_b(), levels(&[("99", "2")])),
    ])
}
