//! # Fill Cost Demo
//!
//! Walks through the fill calculator and venue comparison on fixed books.
//!
//! This demo shows:
//! - Sweeping several ask levels
//! - Full versus partial fill policy
//! - Ranking venues by unit price
//! - Venues that cannot fill anything

use fill_cost_core::{
    compare, compute_fill, format_amount, total_depth, ComparisonError, FillRequest, PriceLevel,
    VenueId,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Main entry point that runs all demo scenarios.
fn main() {
    println!("=== Fill Cost Demo ===\n");

    demo_level_sweep();
    demo_partial_policy();
    demo_venue_ranking();
    demo_zero_liquidity();
}

/// Demonstrates a buy that consumes more than one ask level.
fn demo_level_sweep() {
    println!("-----------------");
    println!("1. Level Sweep:");
    println!("-----------------");

    let asks = levels(&[("100", "1"), ("101", "1"), ("105", "3")]);
    print_asks(&asks);

    for amount in ["0.5", "1.5", "4"] {
        let request = request(amount, false);
        match compute_fill(&asks, &request) {
            Ok(fill) => println!("--Buy {}: {}", amount, fill),
            Err(e) => println!("--Buy {}: {}", amount, e),
        }
    }
    println!();
}

/// Demonstrates what happens when the book is thinner than the request.
fn demo_partial_policy() {
    println!("--------------------------");
    println!("2. Partial Fill Policy:");
    println!("--------------------------");

    let asks = levels(&[("100", "1"), ("101", "0.5")]);
    print_asks(&asks);
    match total_depth(&asks) {
        Some(depth) => println!("--Total depth: {}", depth),
        None => println!("--Total depth: overflow"),
    }

    for allow_partial in [false, true] {
        let request = request("2", allow_partial);
        match compute_fill(&asks, &request) {
            Ok(fill) => println!("--{}: {}", request, fill),
            Err(e) => println!("--{}: {}", request, e),
        }
    }
    println!();
}

/// Demonstrates ranking two venues and the spread between them.
fn demo_venue_ranking() {
    println!("---------------------");
    println!("3. Venue Ranking:");
    println!("---------------------");

    let venues = BTreeMap::from([
        (
            VenueId::new("binance"),
            levels(&[
                ("85813.59", "0.05105"),
                ("85814.00", "0.02500"),
                ("85820.00", "0.10000"),
            ]),
        ),
        (
            VenueId::new("btcturk"),
            levels(&[("85757", "0.02330"), ("85758", "0.02330"), ("85761", "0.01000")]),
        ),
    ]);

    for amount in ["0.001", "0.05"] {
        run_comparison(&venues, &request(amount, false));
    }
}

/// Demonstrates a venue with an empty ask side.
fn demo_zero_liquidity() {
    println!("-------------------------");
    println!("4. Zero Liquidity:");
    println!("-------------------------");

    let venues = BTreeMap::from([
        (VenueId::new("deep"), levels(&[("100", "10")])),
        (VenueId::new("empty"), Vec::new()),
    ]);
    run_comparison(&venues, &request("1", true));
}

fn run_comparison(venues: &BTreeMap<VenueId, Vec<PriceLevel>>, request: &FillRequest) {
    println!("--Request: {}", request);
    match compare(request, venues) {
        Ok(result) => {
            for quote in &result.quotes {
                println!("----{} ({})", quote, quote.fill);
            }
            match result.spread_percent {
                Some(spread) => println!(
                    "--Best: {}, spread {}%",
                    result.best_venue,
                    format_amount(spread)
                ),
                None => println!("--Best: {}", result.best_venue),
            }
        }
        Err(e @ ComparisonError::ZeroLiquidity { .. }) => println!("--Skipped: {}", e),
        Err(e) => println!("--Failed: {}", e),
    }
    println!();
}

/// Prints the ask ladder cheapest first.
fn print_asks(asks: &[PriceLevel]) {
    println!("--Asks:");
    for level in asks {
        println!("----{}", level);
    }
}

/// Helper to build levels from decimal text
fn levels(pairs: &[(&str, &str)]) -> Vec<PriceLevel> {
    pairs
        .iter()
        .map(|(price, quantity)| {
            PriceLevel::new(
                Decimal::from_str(price).unwrap(),
                Decimal::from_str(quantity).unwrap(),
            )
        })
        .collect()
}

fn request(amount: &str, allow_partial: bool) -> FillRequest {
    FillRequest::parse(amount, allow_partial).unwrap()
}
