use serde::Deserialize;

use crate::config::DF;
use crate::domain::{Candle, CandleWindow, ScanError, TradingSymbol};

/// One positional field of a raw kline. Exchanges send prices as strings and timestamps as integers,
/// but either may arrive in the other shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

/// `[open_time, open, high, low, close, volume, close_time, ...]`
pub type RawKline = Vec<RawField>;

const OPEN_TIME: usize = 0;
const OPEN: usize = 1;
const HIGH: usize = 2;
const LOW: usize = 3;
const CLOSE: usize = 4;
const VOLUME: usize = 5;
const CLOSE_TIME: usize = 6;
const REQUIRED_FIELDS: usize = 7;

fn malformed(index: usize, reason: String) -> ScanError {
    ScanError::MalformedCandle { index, reason }
}

fn field_to_float(raw: &[RawField], pos: usize, name: &str, index: usize) -> Result<f64, ScanError> {
    let value = match raw.get(pos) {
        Some(RawField::Integer(i)) => *i as f64,
        Some(RawField::Float(f)) => *f,
        Some(RawField::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed(index, format!("{} '{}' is not numeric", name, s)))?,
        Some(RawField::Null) | None => return Err(malformed(index, format!("{} missing", name))),
    };

    if !value.is_finite() || value < 0.0 {
        return Err(malformed(index, format!("{} out of range: {}", name, value)));
    }
    Ok(value)
}

fn field_to_timestamp(
    raw: &[RawField],
    pos: usize,
    name: &str,
    index: usize,
) -> Result<i64, ScanError> {
    match raw.get(pos) {
        Some(RawField::Integer(i)) => Ok(*i),
        Some(RawField::Float(f)) if f.is_finite() && f.fract() == 0.0 => Ok(*f as i64),
        Some(RawField::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| malformed(index, format!("{} '{}' is not an integer", name, s))),
        Some(other) => Err(malformed(index, format!("{} invalid: {:?}", name, other))),
        None => Err(malformed(index, format!("{} missing", name))),
    }
}

/// Turns one raw record into a typed candle, rejecting anything that does not describe a real bar.
pub fn normalize_kline(index: usize, raw: &[RawField]) -> Result<Candle, ScanError> {
    if raw.len() < REQUIRED_FIELDS {
        return Err(malformed(
            index,
            format!("expected at least {} fields, got {}", REQUIRED_FIELDS, raw.len()),
        ));
    }

    let candle = Candle::new(
        field_to_timestamp(raw, OPEN_TIME, "open_time", index)?,
        field_to_float(raw, OPEN, "open", index)?,
        field_to_float(raw, HIGH, "high", index)?,
        field_to_float(raw, LOW, "low", index)?,
        field_to_float(raw, CLOSE, "close", index)?,
        field_to_float(raw, VOLUME, "volume", index)?,
        field_to_timestamp(raw, CLOSE_TIME, "close_time", index)?,
    );

    candle.check_ohlc().map_err(|reason| malformed(index, reason))?;
    Ok(candle)
}

/// Normalizes a whole batch. Malformed candles are dropped one by one; the window may come back empty.
pub fn normalize_klines(symbol: &TradingSymbol, raw: Vec<RawKline>) -> CandleWindow {
    let received = raw.len();
    let mut candles = Vec::with_capacity(received);

    for (index, record) in raw.iter().enumerate() {
        match normalize_kline(index, record) {
            Ok(candle) => candles.push(candle),
            Err(e) => log::warn!("{}: dropping candle. {}", symbol, e),
        }
    }

    let parsed = candles.len();
    let window = CandleWindow::from_candles(candles);

    if DF.log_candle_drops && window.len() < received {
        log::debug!(
            "{}: kept {}/{} candles ({} malformed, {} duplicate open times).",
            symbol,
            window.len(),
            received,
            received - parsed,
            parsed - window.len()
        );
    }

    window
}
