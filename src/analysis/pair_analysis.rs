#[cfg(debug_assertions)]
use crate::config::DF;
use crate::{
    analysis::{find_threshold_candle, restrict_window, select_reference},
    config::RetracementConfig,
    domain::{Candle, CandleWindow, ScanError, TradingSymbol},
    models::TradingPairResult,
};

/// Assembles the per-symbol record from the reference candle and the (optional) threshold candle.
pub fn classify_pair(
    symbol: TradingSymbol,
    window: CandleWindow,
    reference: Candle,
    threshold: Option<Candle>,
) -> TradingPairResult {
    TradingPairResult {
        symbol,
        candles: window,
        reference_high: reference.high_price,
        threshold_high: threshold.map(|c| c.high_price),
    }
}

/// Runs the whole per-pair pipeline over an already normalized window.
/// Pure: the same window always yields the same result.
pub fn pair_analysis_pure(
    symbol: TradingSymbol,
    window: CandleWindow,
    config: &RetracementConfig,
) -> Result<TradingPairResult, ScanError> {
    let reference = *select_reference(&window)?;
    let threshold = {
        let restricted = restrict_window(&window, &reference, config);
        find_threshold_candle(&restricted, &reference, config).copied()
    };

    #[cfg(debug_assertions)]
    if DF.log_pairs {
        log::info!(
            "{}: reference high {} | threshold high {} | {} candles",
            symbol,
            reference.high_price,
            threshold
                .map(|c| c.high_price.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            window.len()
        );
    }

    Ok(classify_pair(symbol, window, reference, threshold))
}
