//! Retracement thresholds (Immutable Blueprints)

use crate::config::Ratio;

/// The two multipliers that drive the retracement filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetracementConfig {
    /// A candle "reaches the band" when its high is at least `reference.high * threshold_ratio`.
    pub threshold_ratio: Ratio,
    /// Candles whose low sank below `reference.low * low_floor_ratio` are not considered.
    pub low_floor_ratio: Ratio,
}

impl Default for RetracementConfig {
    fn default() -> Self {
        RETRACEMENT
    }
}

pub const RETRACEMENT: RetracementConfig = RetracementConfig {
    threshold_ratio: Ratio::new(0.97),
    low_floor_ratio: Ratio::new(0.5),
};
