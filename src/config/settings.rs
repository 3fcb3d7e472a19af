use std::time::Duration;

use crate::{
    Cli,
    config::{BINANCE, RETRACEMENT, RetracementConfig},
};

/// The live configuration of one engine: blueprint constants with command-line overrides applied.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Candles requested per symbol.
    pub limit: i32,
    /// Retrievals allowed in flight at once.
    pub concurrency: usize,
    /// Deadline for a single symbol's retrieval.
    pub request_timeout: Duration,
    pub quote_asset: String,
    /// Skip symbols the exchange reports as not currently trading. Off by default.
    pub only_trading: bool,
    /// Optional allow-list of exchange symbol names (e.g. `BTCUSDT`).
    pub symbols: Vec<String>,
    pub max_pairs: Option<usize>,
    pub retracement: RetracementConfig,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            limit: BINANCE.limits.klines_limit,
            concurrency: BINANCE.limits.concurrent_fetch_tasks,
            request_timeout: BINANCE.limits.request_timeout,
            quote_asset: BINANCE.market.quote_asset.to_string(),
            only_trading: false,
            symbols: Vec::new(),
            max_pairs: None,
            retracement: RETRACEMENT,
        }
    }
}

impl From<&Cli> for ScanSettings {
    fn from(args: &Cli) -> Self {
        Self {
            limit: args.limit,
            concurrency: args.concurrency.max(1),
            request_timeout: Duration::from_millis(args.timeout_ms),
            only_trading: args.trading_only,
            symbols: args
                .symbols
                .iter()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            max_pairs: args.max_pairs,
            ..Self::default()
        }
    }
}
