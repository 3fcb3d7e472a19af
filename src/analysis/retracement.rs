use crate::{
    config::RetracementConfig,
    domain::{Candle, CandleWindow},
};

/// Keeps, in order, the candles whose low did not sink below `reference.low * low_floor_ratio`.
pub fn restrict_window<'a>(
    window: &'a CandleWindow,
    reference: &Candle,
    config: &RetracementConfig,
) -> Vec<&'a Candle> {
    let floor = reference.low_price * config.low_floor_ratio;
    window.iter().filter(|c| c.low_price >= floor).collect()
}

/// Earliest candle of the restricted window whose high reached `reference.high * threshold_ratio`.
pub fn find_threshold_candle<'a>(
    restricted: &[&'a Candle],
    reference: &Candle,
    config: &RetracementConfig,
) -> Option<&'a Candle> {
    let band = reference.high_price * config.threshold_ratio;
    restricted.iter().copied().find(|c| c.high_price >= band)
}
