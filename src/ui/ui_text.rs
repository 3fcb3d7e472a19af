use std::sync::LazyLock;

pub const ICON_WARNING: &str = "\u{ea6c}";
pub const ICON_COG: &str = "\u{f013}"; // "working"

pub struct UiText {
    // --- Status lines ---
    pub loading: String,
    pub no_pairs: String,
    pub displaying_prefix: String,
    pub batch_failed: String,
    pub not_available: String,
    pub idle: String,

    // --- Watch mode ---
    pub watch_prompt: String,
    pub watch_quit: String,
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    loading: format!("{} Loading...", ICON_COG),
    no_pairs: "No matching pairs found.".to_string(),
    displaying_prefix: "Displaying results:".to_string(),
    batch_failed: format!("{} Scan failed:", ICON_WARNING),
    not_available: "N/A".to_string(),
    idle: "No scan has run yet.".to_string(),

    watch_prompt: "Enter a granularity (1m, 1h, 1d) to rescan, or 'q' to quit.".to_string(),
    watch_quit: "q".to_string(),
});

pub fn loading_line() -> &'static str {
    &UI_TEXT.loading
}

pub fn watch_prompt() -> &'static str {
    &UI_TEXT.watch_prompt
}

pub fn is_quit(token: &str) -> bool {
    token.eq_ignore_ascii_case(&UI_TEXT.watch_quit)
}
