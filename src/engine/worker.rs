use super::messages::{JobRequest, JobResult};

use crate::analysis::pair_analysis_pure;
use crate::config::ScanSettings;
use crate::data::{MarketDataProvider, normalize_klines};
use crate::domain::ScanError;
use crate::models::TradingPairResult;
use crate::utils::AppInstant;

/// Fetch, normalize and classify one symbol. Never touches engine state.
pub async fn process_request(
    provider: &dyn MarketDataProvider,
    req: JobRequest,
    settings: &ScanSettings,
) -> JobResult {
    let start = AppInstant::now();
    let result = fetch_and_analyse(provider, &req, settings).await;

    JobResult {
        symbol: req.symbol,
        duration_ms: start.elapsed().as_millis(),
        result,
    }
}

async fn fetch_and_analyse(
    provider: &dyn MarketDataProvider,
    req: &JobRequest,
    settings: &ScanSettings,
) -> Result<TradingPairResult, ScanError> {
    let fetch = provider.fetch_raw_candles(&req.symbol, req.granularity, settings.limit);

    let raw = tokio::time::timeout(settings.request_timeout, fetch)
        .await
        .map_err(|_| ScanError::Timeout {
            after_ms: settings.request_timeout.as_millis(),
        })??;

    let window = normalize_klines(&req.symbol, raw);
    pair_analysis_pure(req.symbol.clone(), window, &settings.retracement)
}
