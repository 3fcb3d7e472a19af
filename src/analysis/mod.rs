// Per-pair retracement analysis
pub mod pair_analysis;
pub mod reference;
pub mod retracement;

pub use pair_analysis::{classify_pair, pair_analysis_pure};
pub use reference::select_reference;
pub use retracement::{find_threshold_candle, restrict_window};
