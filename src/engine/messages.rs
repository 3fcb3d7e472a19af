use crate::config::Granularity;
use crate::domain::{ScanError, TradingSymbol};
use crate::models::TradingPairResult;

/// A request to fetch and analyse one symbol
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub symbol: TradingSymbol,
    pub granularity: Granularity,
}

/// The result returned by the worker. Failures travel as values so one bad symbol never sinks the batch.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub symbol: TradingSymbol,
    pub duration_ms: u128,
    pub result: Result<TradingPairResult, ScanError>,
}
