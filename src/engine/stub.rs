//! Scripted market data for engine and watch-loop tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::config::Granularity;
use crate::data::{MarketDataProvider, RawField, RawKline, SymbolInfo};
use crate::domain::TradingSymbol;

#[derive(Default)]
pub(crate) struct StubProvider {
    /// `None` makes the symbol list fail.
    pub symbols: Option<Vec<SymbolInfo>>,
    /// Symbols without an entry fail to fetch.
    pub candles: HashMap<String, Vec<RawKline>>,
    pub symbol_delay: HashMap<String, Duration>,
    pub granularity_delay: HashMap<Granularity, Duration>,
    /// Every candle request received, in arrival order.
    pub calls: Mutex<Vec<(String, Granularity)>>,
}

impl StubProvider {
    pub fn calls_at(&self, granularity: Granularity) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, g)| *g == granularity)
            .count()
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    async fn fetch_symbols(&self) -> Result<Vec<SymbolInfo>> {
        self.symbols
            .clone()
            .ok_or_else(|| anyhow!("exchangeInfo: connection refused"))
    }

    async fn fetch_raw_candles(
        &self,
        symbol: &TradingSymbol,
        granularity: Granularity,
        limit: i32,
    ) -> Result<Vec<RawKline>> {
        self.calls
            .lock()
            .unwrap()
            .push((symbol.name.clone(), granularity));
        if let Some(delay) = self.granularity_delay.get(&granularity) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(delay) = self.symbol_delay.get(&symbol.name) {
            tokio::time::sleep(*delay).await;
        }
        let rows = self
            .candles
            .get(&symbol.name)
            .cloned()
            .ok_or_else(|| anyhow!("{}: network error", symbol.name))?;
        Ok(rows.into_iter().rev().take(limit as usize).rev().collect())
    }
}

pub(crate) fn listed(base: &str, quote: &str) -> SymbolInfo {
    SymbolInfo::new(TradingSymbol::from_assets(base, quote))
}

/// Hourly klines with the given highs; lows sit one below each high.
pub(crate) fn rows(highs: &[f64]) -> Vec<RawKline> {
    highs
        .iter()
        .enumerate()
        .map(|(i, &h)| {
            let t = i as i64 * 3_600_000;
            vec![
                RawField::Integer(t),
                RawField::Text(format!("{}", h - 0.5)),
                RawField::Text(format!("{}", h)),
                RawField::Text(format!("{}", h - 1.0)),
                RawField::Text(format!("{}", h - 0.5)),
                RawField::Text("100".into()),
                RawField::Integer(t + 3_599_999),
            ]
        })
        .collect()
}

/// Five USDT symbols (two of them broken) and one BTC-quoted symbol.
/// Only `BBBUSDT` passes the inclusion rule.
pub(crate) fn stub() -> StubProvider {
    let mut candles = HashMap::new();
    candles.insert("AAAUSDT".to_string(), rows(&[10.0, 12.0, 15.0, 11.0, 9.0]));
    candles.insert("BBBUSDT".to_string(), rows(&[10.0, 14.6, 15.0, 11.0]));
    candles.insert("CCCUSDT".to_string(), rows(&[20.0, 30.0, 25.0]));
    candles.insert(
        "BADUSDT".to_string(),
        vec![vec![RawField::Text("garbage".into())]],
    );
    candles.insert("ETHBTC".to_string(), rows(&[1.0, 2.0]));
    StubProvider {
        symbols: Some(vec![
            listed("AAA", "USDT"),
            listed("DOWN", "USDT"),
            listed("BBB", "USDT"),
            listed("ETH", "BTC"),
            listed("BAD", "USDT"),
            listed("CCC", "USDT"),
        ]),
        candles,
        ..Default::default()
    }
}
