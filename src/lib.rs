#![allow(clippy::const_is_empty)]
#![allow(clippy::collapsible_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate (for main.rs)
pub use config::{BINANCE, Granularity, ScanSettings};
pub use data::{BinanceProvider, MarketDataProvider};
pub use engine::{ScanEngine, ScanSnapshot, ScanState};
pub use models::TradingPairResult;
pub use ui::RenderOptions;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Scans USDT pairs for a pullback below their recent high", long_about = None)]
pub struct Cli {
    /// Candle granularity for the scan
    #[arg(short, long, value_enum, default_value_t = Granularity::default())]
    pub granularity: Granularity,

    /// Candles fetched per symbol (most recent first)
    #[arg(long, default_value_t = BINANCE.limits.klines_limit, value_parser = clap::value_parser!(i32).range(1..=1000))]
    pub limit: i32,

    /// Symbol retrievals kept in flight at once
    #[arg(long, default_value_t = BINANCE.limits.concurrent_fetch_tasks)]
    pub concurrency: usize,

    /// Deadline for one symbol's candle retrieval, in milliseconds
    #[arg(long, default_value_t = BINANCE.limits.request_timeout.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Stop after this many symbols (exchange order)
    #[arg(long)]
    pub max_pairs: Option<usize>,

    /// Only scan these symbols, e.g. `BTCUSDT,ETHUSDT`
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Skip symbols the exchange reports as not currently trading
    #[arg(long, default_value_t = false)]
    pub trading_only: bool,

    /// Show excluded pairs as well
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Print results as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Keep running and rescan whenever a granularity is typed on stdin
    #[arg(long, default_value_t = false)]
    pub watch: bool,
}
