use serde::Serialize;

use crate::config::{BaseVol, ClosePrice, HighPrice, LowPrice, OpenPrice, PriceLike};

/// One closed (or still forming) kline, as delivered by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candle {
    pub open_time_ms: i64,

    pub open_price: OpenPrice,
    pub high_price: HighPrice,
    pub low_price: LowPrice,
    pub close_price: ClosePrice,

    pub base_asset_volume: BaseVol,
    pub close_time_ms: i64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(
        open_time_ms: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        close_time_ms: i64,
    ) -> Self {
        Candle {
            open_time_ms,
            open_price: OpenPrice::new(open),
            high_price: HighPrice::new(high),
            low_price: LowPrice::new(low),
            close_price: ClosePrice::new(close),
            base_asset_volume: BaseVol::new(volume),
            close_time_ms,
        }
    }

    /// high >= max(open, close) >= min(open, close) >= low
    pub fn check_ohlc(&self) -> Result<(), String> {
        let (o, c) = (self.open_price, self.close_price);
        if self.high_price < o || self.high_price < c {
            return Err(format!(
                "high {} below body (open {}, close {})",
                self.high_price.value(),
                o.value(),
                c.value()
            ));
        }
        if self.low_price > o || self.low_price > c {
            return Err(format!(
                "low {} above body (open {}, close {})",
                self.low_price.value(),
                o.value(),
                c.value()
            ));
        }
        if self.close_time_ms < self.open_time_ms {
            return Err(format!(
                "close time {} before open time {}",
                self.close_time_ms, self.open_time_ms
            ));
        }
        Ok(())
    }
}
