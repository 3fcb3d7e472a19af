use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    binance_sdk::{
        config::ConfigurationRestApi,
        errors::{self, ConnectorError as connection_error},
        spot::{
            SpotRestApi,
            rest_api::{
                ExchangeInfoParams, KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi,
            },
        },
    },
    std::{error::Error, fmt},
};

use crate::{
    config::{BinanceApiConfig, Granularity},
    data::{MarketDataProvider, RawField, RawKline, SymbolInfo},
    domain::TradingSymbol,
};

fn interval_from_granularity(granularity: Granularity) -> KlinesIntervalEnum {
    match granularity {
        Granularity::Minute => KlinesIntervalEnum::Interval1m,
        Granularity::Hour => KlinesIntervalEnum::Interval1h,
        Granularity::Day => KlinesIntervalEnum::Interval1d,
    }
}

#[derive(Debug)]
pub enum BinanceError {
    ConnectionFailed(String),
    MissingSymbols,
}

impl fmt::Display for BinanceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            BinanceError::ConnectionFailed(msg) => {
                write!(f, "Binance API connection failed: {}.", msg)
            }
            BinanceError::MissingSymbols => write!(f, "exchangeInfo returned no symbol list"),
        }
    }
}

impl Error for BinanceError {}

fn kline_item_to_raw(item: KlinesItemInner) -> RawField {
    match item {
        KlinesItemInner::Integer(i) => RawField::Integer(i),
        KlinesItemInner::String(s) => RawField::Text(s),
        #[allow(unreachable_patterns)]
        _ => RawField::Null,
    }
}

fn configure_binance_client() -> Result<RestApi> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    Ok(SpotRestApi::production(rest_conf))
}

/// Logs the connector failure with a hint and wraps it for the caller.
fn connector_failure(e: anyhow::Error, what: &str) -> anyhow::Error {
    if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
        match conn_err {
            connection_error::ConnectorClientError(msg) => {
                log::error!("{} Client error: Check your request parameters. {}", what, msg);
            }
            connection_error::TooManyRequestsError(msg) => {
                log::warn!("{} Rate limit exceeded. {}", what, msg);
            }
            connection_error::RateLimitBanError(msg) => {
                log::error!(
                    "{} IP address banned due to excessive rate limits. {}",
                    what,
                    msg
                );
            }
            errors::ConnectorError::ServerError { msg, status_code } => {
                log::error!(
                    "{} Server error: {} (status code: {:?})",
                    what,
                    msg,
                    status_code
                );
            }
            errors::ConnectorError::NetworkError(msg) => {
                log::error!(
                    "{} Network error: Check your internet connection. {}",
                    what,
                    msg
                );
            }
            errors::ConnectorError::NotFoundError(msg) => {
                log::warn!("{} Resource not found. {}", what, msg);
            }
            connection_error::BadRequestError(msg) => {
                // Delisted or otherwise unknown symbols land here
                log::warn!("{} Bad request. {}", what, msg);
            }
            other => {
                log::error!("{} Unexpected ConnectionError variant: {:?}", what, other);
            }
        }
        anyhow::Error::new(BinanceError::ConnectionFailed(conn_err.to_string()))
            .context(format!("Binance API call failed for {}", what))
    } else {
        log::error!("An unexpected error occurred for {}: {:#}", what, e);
        anyhow::Error::new(BinanceError::ConnectionFailed(e.to_string()))
            .context(format!("Unexpected error during API call for {}", what))
    }
}

/// Binance spot REST: `exchangeInfo` for the symbol universe and `klines` for each window.
pub struct BinanceProvider {
    rest_client: RestApi,
}

impl BinanceProvider {
    pub fn new() -> Result<Self> {
        let rest_client =
            configure_binance_client().context("Failed to configure the Binance REST client")?;
        Ok(Self { rest_client })
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    async fn fetch_symbols(&self) -> Result<Vec<SymbolInfo>> {
        let response = self
            .rest_client
            .exchange_info(ExchangeInfoParams::default())
            .await
            .map_err(|e| connector_failure(e, "exchangeInfo"))?;
        let info = response.data().await?;

        let symbols = info.symbols.ok_or(BinanceError::MissingSymbols)?;

        Ok(symbols
            .into_iter()
            .filter_map(|s| {
                let base = s.base_asset?;
                let quote = s.quote_asset?;
                let symbol = match s.symbol {
                    Some(name) => TradingSymbol::new(name, base, quote),
                    None => TradingSymbol::from_assets(&base, &quote),
                };
                Some(SymbolInfo {
                    symbol,
                    status: s.status,
                })
            })
            .collect())
    }

    async fn fetch_raw_candles(
        &self,
        symbol: &TradingSymbol,
        granularity: Granularity,
        limit: i32,
    ) -> Result<Vec<RawKline>> {
        let params = KlinesParams::builder(
            symbol.bn_name().to_string(),
            interval_from_granularity(granularity),
        )
        .limit(limit)
        .build()?;

        let response = self
            .rest_client
            .klines(params)
            .await
            .map_err(|e| connector_failure(e, symbol.bn_name()))?;
        let data = response.data().await?;

        Ok(data
            .into_iter()
            .map(|row| row.into_iter().map(kline_item_to_raw).collect())
            .collect())
    }
}
