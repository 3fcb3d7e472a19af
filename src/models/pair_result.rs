use serde::Serialize;

use crate::{
    config::{HighPrice, PriceLike},
    domain::{CandleWindow, TradingSymbol},
};

/// Everything the scanner knows about one pair after a refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingPairResult {
    pub symbol: TradingSymbol,
    pub candles: CandleWindow,
    /// Highest high of the window.
    pub reference_high: HighPrice,
    /// High of the earliest admissible candle inside the band, if one exists.
    pub threshold_high: Option<HighPrice>,
}

impl TradingPairResult {
    /// A pair is worth showing unless the first candle to reach the band sits exactly at the peak.
    pub fn is_included(&self) -> bool {
        match self.threshold_high {
            Some(threshold) => threshold != self.reference_high,
            None => true,
        }
    }

    /// How far below the reference high the threshold candle topped out, as a fraction (0.0 - 0.03).
    pub fn pullback_0_1(&self) -> Option<f64> {
        self.threshold_high
            .map(|t| t.percent_diff_from_0_1(&self.reference_high))
    }
}
