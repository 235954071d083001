//! stockcorr - windowed average price and pairwise correlation
//!
//! # Usage
//! ```sh
//! stockcorr average --ticker NVDA --minutes 50
//! stockcorr correlation --ticker NVDA --ticker PYPL --minutes 50
//! ```
//!
//! # Environment Variables
//! - `MODE` - `http` (default) or `mock` for generated offline data
//! - `PRICE_API_BASE_URL`, `PRICE_API_TOKEN` - upstream price API
//! - `ALIGNMENT_TOLERANCE_MS` - max gap for two ticks to count as simultaneous (default: 600000)
//! - `DEFAULT_WINDOW_MINUTES` - window when `--minutes` is omitted (default: 60)

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use stockcorr::application::analytics::PriceQueryService;
use stockcorr::config::{Config, Mode};
use stockcorr::domain::ports::PriceHistoryProvider;
use stockcorr::infrastructure::observability::Metrics;
use stockcorr::infrastructure::{HttpPriceProvider, MockPriceProvider, SystemClock};
use stockcorr::interfaces::{AverageResponse, CorrelationResponse};
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Windowed stock price average and correlation", long_about = None)]
struct Cli {
    /// Print Prometheus metrics to stderr after the query
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Average price of one ticker over a trailing window
    Average {
        /// Ticker symbol
        #[arg(short, long)]
        ticker: String,

        /// Window length in minutes
        #[arg(short, long, allow_negative_numbers = true)]
        minutes: Option<i64>,
    },
    /// Pearson correlation between two tickers over a trailing window
    Correlation {
        /// Ticker symbol, given exactly twice
        #[arg(short, long = "ticker", required = true)]
        tickers: Vec<String>,

        /// Window length in minutes
        #[arg(short, long, allow_negative_numbers = true)]
        minutes: Option<i64>,
    },
}

impl Commands {
    fn tickers(&self) -> Vec<String> {
        match self {
            Commands::Average { ticker, .. } => vec![ticker.clone()],
            Commands::Correlation { tickers, .. } => tickers.clone(),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    info!(
        "stockcorr {} starting: Mode={:?}, Tolerance={}ms",
        env!("CARGO_PKG_VERSION"),
        config.mode,
        config.query.alignment_tolerance_ms
    );

    let provider: Arc<dyn PriceHistoryProvider> = match config.mode {
        Mode::Http => Arc::new(HttpPriceProvider::new(&config.provider)?),
        Mode::Mock => Arc::new(MockPriceProvider::random_walk(
            &cli.command.tickers(),
            Utc::now(),
            120,
            Duration::minutes(1),
        )),
    };

    let metrics = Metrics::new()?;
    let service = PriceQueryService::new(
        provider,
        Arc::new(SystemClock),
        config.to_query_settings(),
        metrics.clone(),
    );
    let default_minutes = config.query.default_window_minutes;

    match &cli.command {
        Commands::Average { ticker, minutes } => {
            let report = service
                .compute_average(ticker, minutes.unwrap_or(default_minutes))
                .await?;
            print_json(&AverageResponse::from(&report))?;
        }
        Commands::Correlation { tickers, minutes } => {
            let report = service
                .compute_correlation(tickers, minutes.unwrap_or(default_minutes))
                .await?;
            print_json(&CorrelationResponse::from(&report))?;
        }
    }

    if cli.metrics && config.observability.enabled {
        eprintln!("{}", metrics.render());
    }

    Ok(())
}
