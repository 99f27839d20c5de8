use crate::error::FillError;
use crate::types::{FillRequest, FillResult, PriceLevel};
use crate::units::round8;
use rust_decimal::Decimal;

/// Walks ask levels cheapest first and prices the purchase of
/// `request.target_amount` units of base asset.
///
/// `levels` must be sorted by ascending price. Unsorted input is not
/// rejected here and yields a wrong cost; [`crate::OrderBookSnapshot::ask_levels`]
/// enforces the ordering for fetched books.
///
/// The walk accumulates exact decimals and rounds to 8 places only in the
/// returned [`FillResult`].
///
/// # Errors
///
/// * [`FillError::InvalidAmount`] if the target is not positive
/// * [`FillError::InsufficientLiquidity`] if the levels run out before the
///   target is reached and `request.allow_partial` is false
/// * [`FillError::Overflow`] if the cost leaves the `Decimal` range
pub fn compute_fill(levels: &[PriceLevel], request: &FillRequest) -> Result<FillResult, FillError> {
    request.validate()?;

    let mut remaining = request.target_amount;
    let mut cost = Decimal::ZERO;
    let mut filled = Decimal::ZERO;

    for level in levels {
        if remaining <= Decimal::ZERO {
            break;
        }
        let take = remaining.min(level.quantity);
        if take <= Decimal::ZERO {
            continue;
        }
        cost = take
            .checked_mul(level.price)
            .and_then(|step| cost.checked_add(step))
            .ok_or_else(|| FillError::Overflow {
                context: format!("taking {} at {}", take, level.price),
            })?;
        filled += take;
        remaining -= take;
    }

    let is_partial = remaining > Decimal::ZERO;
    if is_partial && !request.allow_partial {
        return Err(FillError::InsufficientLiquidity {
            requested: request.target_amount,
            available: filled,
        });
    }

    Ok(FillResult {
        quote_cost: round8(cost),
        filled_amount: round8(filled),
        unfilled_amount: round8(remaining),
        is_partial,
    })
}

/// Total base quantity offered across `levels`, or `None` if the sum
/// overflows.
pub fn total_depth(levels: &[PriceLevel]) -> Option<Decimal> {
    levels
        .iter()
        .try_fold(Decimal::ZERO, |depth, level| depth.checked_add(level.quantity))
}

#[cfg(test)]
mod fill_tests {
    use super::*;
    use crate::test_support::*;
    use rust_decimal_macros::dec;

    #[test]
    fn single_level_covers_target() {
        let asks = levels(&[("85813.59", "0.05105")]);
        let result = compute_fill(&asks, &FillRequest::new(dec!(0.001), false)).unwrap();
        assert_eq!(result.quote_cost, dec!(85.81359));
        assert_eq!(result.filled_amount, dec!(0.001));
        assert_eq!(result.unfilled_amount, dec!(0));
        assert!(!result.is_partial);
    }

    #[test]
    fn walk_sweeps_levels_in_order() {
        let asks = levels(&[("100", "1"), ("101", "1")]);
        let result = compute_fill(&asks, &FillRequest::new(dec!(1.5), false)).unwrap();
        // 1 * 100 + 0.5 * 101
        assert_eq!(result.quote_cost, dec!(150.5));
        assert_eq!(result.filled_amount, dec!(1.5));
        assert!(!result.is_partial);
    }

    #[test]
    fn exact_depth_is_a_full_fill() {
        let asks = levels(&[("100", "1"), ("101", "1")]);
        let result = compute_fill(&asks, &FillRequest::new(dec!(2), false)).unwrap();
        assert_eq!(result.quote_cost, dec!(201));
        assert_eq!(result.unfilled_amount, dec!(0));
        assert!(!result.is_partial);
    }

    #[test]
    fn walk_stops_once_filled() {
        // The second level would be unaffordable garbage if it were touched.
        let asks = levels(&[("100", "5"), ("999999", "5")]);
        let result = compute_fill(&asks, &FillRequest::new(dec!(5), false)).unwrap();
        assert_eq!(result.quote_cost, dec!(500));
    }

    #[test]
    fn insufficient_depth_without_partial_fails() {
        let asks = levels(&[("100", "1"), ("101", "0.5")]);
        let err = compute_fill(&asks, &FillRequest::new(dec!(2), false)).unwrap_err();
        assert_eq!(
            err,
            FillError::InsufficientLiquidity {
                requested: dec!(2),
                available: dec!(1.5),
            }
        );
    }

    #[test]
    fn insufficient_depth_with_partial_fills_total_depth() {
        let asks = levels(&[("100", "1"), ("101", "0.5")]);
        let result = compute_fill(&asks, &FillRequest::new(dec!(2), true)).unwrap();
        assert!(result.is_partial);
        assert_eq!(Some(result.filled_amount), total_depth(&asks));
        assert_eq!(result.unfilled_amount, dec!(0.5));
        assert_eq!(result.quote_cost, dec!(150.5));
    }

    #[test]
    fn empty_book_with_partial_returns_empty_fill() {
        let result = compute_fill(&[], &FillRequest::new(dec!(0.5), true)).unwrap();
        assert!(result.is_partial);
        assert!(result.is_empty());
        assert_eq!(result.quote_cost, dec!(0));
        assert_eq!(result.unfilled_amount, dec!(0.5));
    }

    #[test]
    fn empty_book_without_partial_fails() {
        let err = compute_fill(&[], &FillRequest::new(dec!(0.5), false)).unwrap_err();
        assert!(matches!(err, FillError::InsufficientLiquidity { .. }));
    }

    #[test]
    fn non_positive_target_is_rejected() {
        let asks = levels(&[("100", "1")]);
        for amount in [dec!(0), dec!(-1)] {
            let err = compute_fill(&asks, &FillRequest::new(amount, true)).unwrap_err();
            assert!(matches!(err, FillError::InvalidAmount { .. }));
        }
    }

    #[test]
    fn zero_quantity_levels_are_skipped() {
        let asks = levels(&[("99", "0"), ("100", "1")]);
        let result = compute_fill(&asks, &FillRequest::new(dec!(1), false)).unwrap();
        assert_eq!(result.quote_cost, dec!(100));
    }

    #[test]
    fn outputs_are_rounded_to_eight_places() {
        let asks = levels(&[("0.333333333", "3")]);
        let result = compute_fill(&asks, &FillRequest::new(dec!(1), false)).unwrap();
        assert_eq!(result.quote_cost, dec!(0.33333333));
    }

    #[test]
    fn oversized_book_is_an_overflow_error() {
        let asks = levels(&[("100000000000000000000", "1000000000")]);
        let err = compute_fill(&asks, &FillRequest::new(dec!(1000000000), false)).unwrap_err();
        assert!(matches!(err, FillError::Overflow { .. }));
        assert!(err.to_string().starts_with("cost overflowed the decimal range"));
    }

    #[test]
    fn cost_overflow_across_levels_is_an_error() {
        let asks = levels(&[
            ("50000000000000000000", "1000000000"),
            ("50000000000000000000", "1000000000"),
        ]);
        let err = compute_fill(&asks, &FillRequest::new(dec!(2000000000), true)).unwrap_err();
        assert!(matches!(err, FillError::Overflow { .. }));
    }

    #[test]
    fn total_depth_reports_overflow() {
        let huge = Decimal::MAX.to_string();
        let asks = levels(&[("1", huge.as_str()), ("2", huge.as_str())]);
        assert_eq!(total_depth(&asks), None);
        assert_eq!(total_depth(&levels(&[("1", "0.5"), ("2", "1.5")])), Some(dec!(2)));
    }

    #[test]
    fn many_small_levels_do_not_drift() {
        // 10_000 levels of 0.0001 @ 0.1: binary floats drift here, decimals do not.
        let asks: Vec<PriceLevel> = (0..10_000)
            .map(|_| PriceLevel::new(dec!(0.1), dec!(0.0001)))
            .collect();
        let result = compute_fill(&asks, &FillRequest::new(dec!(1), false)).unwrap();
        assert_eq!(result.filled_amount, dec!(1));
        assert_eq!(result.quote_cost, dec!(0.1));
        assert_eq!(result.unfilled_amount, dec!(0));
    }

    #[test]
    fn filled_plus_unfilled_equals_target() {
        let asks = levels(&[
            ("85757", "0.02330"),
            ("85758", "0.02330"),
            ("85761", "0.01000"),
        ]);
        let targets = ["0.00000001", "0.001", "0.0233", "0.02330001", "0.05", "0.0566", "0.1", "7"];
        for target in targets {
            let target = dec(target);
            let result = compute_fill(&asks, &FillRequest::new(target, true)).unwrap();
            let total = result.filled_amount + result.unfilled_amount;
            assert!((total - target).abs() <= dec!(0.00000001), "target {target}");
        }
    }

    #[test]
    fn cost_is_monotonic_in_amount() {
        let asks = levels(&[
            ("85813.59", "0.05105"),
            ("85814.00", "0.02500"),
            ("85820.00", "0.10000"),
        ]);
        let depth = total_depth(&asks).unwrap();
        let mut previous = Decimal::ZERO;
        let mut amount = dec!(0.005);
        while amount <= depth {
            let result = compute_fill(&asks, &FillRequest::new(amount, false)).unwrap();
            assert!(result.quote_cost >= previous, "amount {amount}");
            previous = result.quote_cost;
            amount += dec!(0.005);
        }
    }
}
