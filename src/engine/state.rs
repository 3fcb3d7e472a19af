use std::sync::Arc;

use crate::config::Granularity;
use crate::models::TradingPairResult;

/// Lifecycle of the scanner: Idle -> Fetching -> Ready | Failed, restarting on every refresh.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Fetching {
        granularity: Granularity,
    },
    Ready {
        granularity: Granularity,
        /// Every successfully analysed pair, in symbol-list order (before the inclusion rule).
        pairs: Arc<Vec<TradingPairResult>>,
        /// Symbols left out because their retrieval or analysis failed.
        failed: usize,
    },
    Failed {
        granularity: Granularity,
        error: String,
    },
}

/// What the display layer sees: one immutable, fully merged state tagged with the batch that produced it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanSnapshot {
    pub generation: u64,
    pub state: ScanState,
}

impl ScanSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ScanState::Fetching { .. })
    }

    pub fn granularity(&self) -> Option<Granularity> {
        match &self.state {
            ScanState::Idle => None,
            ScanState::Fetching { granularity }
            | ScanState::Ready { granularity, .. }
            | ScanState::Failed { granularity, .. } => Some(*granularity),
        }
    }

    /// Full result set of a finished batch; empty while idle, loading or failed.
    pub fn all_pairs(&self) -> &[TradingPairResult] {
        match &self.state {
            ScanState::Ready { pairs, .. } => pairs.as_slice(),
            _ => &[],
        }
    }

    /// The pairs worth showing, in symbol-list order.
    pub fn displayed(&self) -> Vec<&TradingPairResult> {
        self.all_pairs().iter().filter(|p| p.is_included()).collect()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ScanState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}
