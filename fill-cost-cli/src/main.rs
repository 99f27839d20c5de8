//! # Fill Cost CLI
//!
//! Compares what it costs to buy an amount of a base asset across venues.
//!
//! Order books are fetched live from the venues' REST APIs, or read from a JSON
//! snapshot file with `--snapshot`.

use clap::{Parser, ValueEnum};
use fill_cost_core::{
    compare_venues, format_amount, ComparisonError, ComparisonResult, FillRequest,
    OrderBookSnapshot, OrderBookSource, StaticOrderBookSource, VenueId, VenueQuote,
};
use fill_cost_venues::{HttpOrderBookSource, SourceSettings, VenueConfig, VenueKind};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fill-cost")]
#[command(about = "Compare the cost of buying an amount across order books", long_about = None)]
struct Cli {
    /// Amount of base asset to buy (e.g., 0.001 or 1e-3)
    #[arg(long, env = "FILL_COST_AMOUNT", default_value = "0.001", allow_hyphen_values = true)]
    amount: String,

    /// Accept a partial fill when a venue's book is too thin
    #[arg(long, env = "FILL_COST_ALLOW_PARTIAL")]
    allow_partial: bool,

    /// Trading pair symbol as the venues name it
    #[arg(long, env = "FILL_COST_SYMBOL", default_value = "BTCUSDT")]
    symbol: String,

    /// Price levels to request per side
    #[arg(long, env = "FILL_COST_DEPTH", default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(1..=5000))]
    depth: u32,

    /// Venues to compare (repeatable; default: all)
    #[arg(long = "venue", value_enum)]
    venues: Vec<VenueKind>,

    /// Per-request timeout in seconds
    #[arg(long, env = "FILL_COST_TIMEOUT_SECS", default_value_t = 5)]
    timeout_secs: u64,

    /// Override the Binance API base URL
    #[arg(long, env = "FILL_COST_BINANCE_URL")]
    binance_url: Option<String>,

    /// Override the BtcTurk API base URL
    #[arg(long, env = "FILL_COST_BTCTURK_URL")]
    btcturk_url: Option<String>,

    /// Read order books from a JSON file (`{"venue": {"asks": [[p, q]], "bids": [..]}}`)
    /// instead of fetching them
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    let request = match FillRequest::parse(&cli.amount, cli.allow_partial) {
        Ok(request) => request,
        Err(e) => {
            report(&ComparisonError::InvalidAmount(e));
            return ExitCode::FAILURE;
        }
    };

    let (source, venues) = match build_source(&cli) {
        Ok(built) => built,
        Err(e) => {
            report(e.as_ref());
            return ExitCode::FAILURE;
        }
    };

    match compare_venues(source.as_ref(), &venues, &cli.symbol, cli.depth, &request).await {
        Ok(result) => match cli.format {
            OutputFormat::Text => {
                print_comparison(&result, &cli.symbol);
                ExitCode::SUCCESS
            }
            OutputFormat::Json => match serde_json::to_string_pretty(&result) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: failed to encode result: {}", e);
                    ExitCode::FAILURE
                }
            },
        },
        Err(e) if e.is_total_illiquidity() => {
            println!(
                "No liquidity: none of the venues could fill any of {}.",
                format_amount(request.target_amount)
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Prints an error and the chain of errors that caused it. A cause whose text
/// the previous message already contains is not repeated.
fn report(err: &dyn Error) {
    let mut shown = err.to_string();
    eprintln!("Error: {}", shown);
    let mut cause = err.source();
    while let Some(e) = cause {
        let text = e.to_string();
        if !shown.contains(&text) {
            eprintln!("  caused by: {}", text);
        }
        shown = text;
        cause = e.source();
    }
}

/// Picks the order book source and the venues to compare.
fn build_source(
    cli: &Cli,
) -> Result<(Box<dyn OrderBookSource>, Vec<VenueId>), Box<dyn Error>> {
    if let Some(path) = &cli.snapshot {
        let source = load_snapshot(path)?;
        let venues = if cli.venues.is_empty() {
            source.venues()
        } else {
            cli.venues.iter().map(|kind| kind.id()).collect()
        };
        return Ok((Box::new(source), venues));
    }

    let kinds = if cli.venues.is_empty() {
        VenueKind::ALL.to_vec()
    } else {
        cli.venues.clone()
    };
    let configs: Vec<VenueConfig> = kinds
        .iter()
        .map(|&kind| {
            let config = VenueConfig::for_kind(kind);
            match (kind, &cli.binance_url, &cli.btcturk_url) {
                (VenueKind::Binance, Some(url), _) | (VenueKind::Btcturk, _, Some(url)) => {
                    config.with_base_url(url.clone())
                }
                _ => config,
            }
        })
        .collect();
    let venues = configs.iter().map(VenueConfig::venue_id).collect();

    let mut settings = SourceSettings::new(configs);
    settings.timeout_secs = cli.timeout_secs;
    let source = HttpOrderBookSource::new(&settings)?;
    Ok((Box::new(source), venues))
}

fn load_snapshot(path: &Path) -> Result<StaticOrderBookSource, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read snapshot {}: {}", path.display(), e))?;
    let books: BTreeMap<String, OrderBookSnapshot> = serde_json::from_str(&text)
        .map_err(|e| format!("invalid snapshot {}: {}", path.display(), e))?;
    Ok(books
        .into_iter()
        .map(|(venue, book)| (VenueId::from(venue), book))
        .collect())
}

fn print_comparison(result: &ComparisonResult, symbol: &str) {
    println!(
        "Buying {} {} (partial fills {})",
        format_amount(result.request.target_amount),
        symbol,
        if result.request.allow_partial { "allowed" } else { "disallowed" }
    );
    println!();

    for quote in &result.quotes {
        print_quote(quote);
    }

    println!("Best venue: {}", result.best_venue);
    match (result.spread_percent, result.runner_up()) {
        (Some(spread), Some(runner_up)) => {
            println!("Spread vs {}: {}%", runner_up.venue, format_amount(spread))
        }
        _ => println!("Spread: no comparison possible (single venue)"),
    }
}

fn print_quote(quote: &VenueQuote) {
    let fill = &quote.fill;
    println!("#{} {}", quote.rank, quote.venue);
    println!("  Unit price: {}", format_amount(quote.price_per_unit));
    println!("  Quote cost: {}", format_amount(fill.quote_cost));
    println!("  Filled:     {}", format_amount(fill.filled_amount));
    println!("  Unfilled:   {}", format_amount(fill.unfilled_amount));
    println!("  Partial:    {}", if fill.is_partial { "yes" } else { "no" });
    println!();
}
