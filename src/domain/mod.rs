// Domain types and value objects
mod candle;
mod error;
mod symbol;
mod window;

pub use candle::Candle;
pub use error::ScanError;
pub use symbol::TradingSymbol;
pub use window::CandleWindow;
