use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Asset minor-unit precision every reported amount is rounded to.
pub const OUTPUT_DECIMALS: u32 = 8;

/// Rounds to 8 decimal places, halves away from zero.
#[inline]
pub fn round8(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(OUTPUT_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Parses decimal text as venues and users send it: plain (`"85813.59"`) or
/// scientific (`"1e-3"`). Surrounding whitespace is ignored.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Relative difference of `other` over `best`, in percent, rounded to 8 places.
///
/// Returns `None` when the smaller of the two prices is zero.
pub fn spread_percent(best: Decimal, other: Decimal) -> Option<Decimal> {
    let base = best.min(other);
    if base.is_zero() {
        return None;
    }
    let diff = (best - other).abs();
    diff.checked_div(base)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round8)
}

/// Formats an amount without trailing zeros, e.g. `0.00100000` as `0.001`.
pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}
