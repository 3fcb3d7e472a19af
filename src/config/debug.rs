//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Activate trace_time macro (for cool scope-level timing)
    pub log_performance: bool,

    /// Log every pair's reference / threshold highs as they are classified.
    pub log_pairs: bool,

    /// Log candles dropped by the normalizer.
    pub log_candle_drops: bool,

    /// Log batch lifecycle (generation numbers, commits, stale discards).
    pub log_engine_core: bool,
}

pub const DF: LogFlags = LogFlags {
    log_performance: true,
    log_pairs: false,
    log_candle_drops: true,
    log_engine_core: true,
};
