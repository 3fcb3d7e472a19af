use serde::Serialize;

use crate::domain::Candle;

/// The short lookback of candles for one symbol, ascending by open time, one candle per open time.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(transparent)]
pub struct CandleWindow {
    candles: Vec<Candle>,
}

impl CandleWindow {
    /// Sorts ascending (stable) and keeps the first candle seen for any repeated open time.
    pub fn from_candles(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.open_time_ms);
        candles.dedup_by_key(|c| c.open_time_ms);
        Self { candles }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// (first open time, last close time), if any candle exists.
    pub fn span_ms(&self) -> Option<(i64, i64)> {
        match (self.candles.first(), self.candles.last()) {
            (Some(first), Some(last)) => Some((first.open_time_ms, last.close_time_ms)),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a CandleWindow {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
