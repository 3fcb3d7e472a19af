use crate::domain::{Candle, CandleWindow, ScanError};

/// The candle with the highest high. Scanning in ascending time, a later candle only replaces the
/// current maximum when strictly higher, so the earliest of several equal highs wins.
pub fn select_reference(window: &CandleWindow) -> Result<&Candle, ScanError> {
    let mut candles = window.iter();
    let first = candles.next().ok_or(ScanError::EmptyWindow)?;

    Ok(candles.fold(first, |max, current| {
        if current.high_price > max.high_price {
            current
        } else {
            max
        }
    }))
}
