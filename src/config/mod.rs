//! Configuration module for the retrace scanner.

// Can all be private now because we have a public re-export.
mod analysis;
mod binance;
mod debug;
mod settings;
mod types;

// Re-export commonly used items
pub use analysis::{RETRACEMENT, RetracementConfig};
pub use binance::{BINANCE, BinanceApiConfig};
pub use debug::DF;
pub use settings::ScanSettings;
pub use types::{
    BaseVol, ClosePrice, Granularity, HighPrice, LowPrice, OpenPrice, PriceLike, Ratio,
};
