use anyhow::Result;
use async_trait::async_trait;

use crate::config::Granularity;
use crate::data::RawKline;
use crate::domain::TradingSymbol;

/// One entry of the exchange's instrument list.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub symbol: TradingSymbol,
    /// Trading status as reported by the exchange (`TRADING`, `BREAK`, ...), if it reports one.
    pub status: Option<String>,
}

impl SymbolInfo {
    pub fn new(symbol: TradingSymbol) -> Self {
        Self {
            symbol,
            status: None,
        }
    }
}

/// Abstract interface for fetching market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Every tradable instrument the exchange lists, in the exchange's own order.
    async fn fetch_symbols(&self) -> Result<Vec<SymbolInfo>>;

    /// The most recent `limit` candles for a symbol, as raw positional records.
    async fn fetch_raw_candles(
        &self,
        symbol: &TradingSymbol,
        granularity: Granularity,
        limit: i32,
    ) -> Result<Vec<RawKline>>;
}
