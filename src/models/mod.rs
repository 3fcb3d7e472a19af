mod pair_result;

pub use pair_result::TradingPairResult;
