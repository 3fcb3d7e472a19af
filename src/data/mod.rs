mod binance;
mod provider;
mod raw_kline;

pub use {
    binance::BinanceProvider,
    provider::{MarketDataProvider, SymbolInfo},
    raw_kline::{RawField, RawKline, normalize_kline, normalize_klines},
};
