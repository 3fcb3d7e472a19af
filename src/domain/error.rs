use std::{error::Error, fmt};

/// Everything that can knock a candle or a whole symbol out of a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    /// A single raw record could not be turned into a candle. Only that candle is dropped.
    MalformedCandle { index: usize, reason: String },
    /// No usable candle left for a symbol. The symbol is excluded.
    EmptyWindow,
    /// The data source failed outright (transport, HTTP status, decoding).
    SourceUnavailable(String),
    /// The data source did not answer within the per-request deadline.
    Timeout { after_ms: u128 },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            ScanError::MalformedCandle { index, reason } => {
                write!(f, "Malformed candle #{}: {}", index, reason)
            }
            ScanError::EmptyWindow => write!(f, "Empty candle window"),
            ScanError::SourceUnavailable(msg) => write!(f, "Data source unavailable: {}", msg),
            ScanError::Timeout { after_ms } => {
                write!(f, "Data source timed out after {}ms", after_ms)
            }
        }
    }
}

impl Error for ScanError {}

impl From<anyhow::Error> for ScanError {
    fn from(e: anyhow::Error) -> Self {
        ScanError::SourceUnavailable(format!("{:#}", e))
    }
}
