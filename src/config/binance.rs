use std::time::Duration;

pub struct BinanceApiConfig {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for BinanceApiConfig {
    fn default() -> Self {
        Self {
            timeout_ms: BINANCE.client.timeout_ms,
            retries: BINANCE.client.retries,
            backoff_ms: BINANCE.client.backoff_ms,
        }
    }
}

/// REST constraints: one short klines batch per symbol, fan-out width and per-call deadline.
pub struct RestLimits {
    pub klines_limit: i32,
    pub concurrent_fetch_tasks: usize,
    pub request_timeout: Duration,
}

pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

pub struct MarketFilter {
    pub quote_asset: &'static str,
    /// Status reported by exchangeInfo for symbols that can currently trade.
    pub trading_status: &'static str,
}

pub struct BinanceConfig {
    pub limits: RestLimits,
    pub client: ClientDefaults,
    pub market: MarketFilter,
}

pub const BINANCE: BinanceConfig = BinanceConfig {
    limits: RestLimits {
        klines_limit: 10,
        concurrent_fetch_tasks: 16,
        request_timeout: Duration::from_secs(15),
    },
    client: ClientDefaults {
        timeout_ms: 5000,
        retries: 0, // No retries: a failed symbol is simply left out of the batch
        backoff_ms: 1000,
    },
    market: MarketFilter {
        quote_asset: "USDT",
        trading_status: "TRADING",
    },
};
