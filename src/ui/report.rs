use anyhow::Result;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::config::{Granularity, PriceLike};
use crate::engine::{ScanSnapshot, ScanState};
use crate::models::TradingPairResult;
use crate::ui::UI_TEXT;
use crate::utils::epoch_ms_to_utc;

/// How a snapshot should be printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Show excluded pairs as well as the ones passing the inclusion rule.
    pub show_all: bool,
    pub json: bool,
}

#[derive(Tabled)]
struct PairRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Reference High")]
    reference_high: String,
    #[tabled(rename = "97% High")]
    threshold_high: String,
    #[tabled(rename = "Pullback")]
    pullback: String,
    #[tabled(rename = "Candles")]
    candles: usize,
    #[tabled(rename = "Window (UTC)")]
    window: String,
}

impl From<&TradingPairResult> for PairRow {
    fn from(pair: &TradingPairResult) -> Self {
        let na = || UI_TEXT.not_available.clone();
        Self {
            symbol: pair.symbol.to_string(),
            reference_high: pair.reference_high.format_price(),
            threshold_high: pair
                .threshold_high
                .map(|h| h.format_price())
                .unwrap_or_else(na),
            pullback: pair
                .pullback_0_1()
                .map(|p| format!("{:.2}%", p * 100.0))
                .unwrap_or_else(na),
            candles: pair.candles.len(),
            window: pair
                .candles
                .span_ms()
                .map(|(start, end)| format!("{} -> {}", epoch_ms_to_utc(start), epoch_ms_to_utc(end)))
                .unwrap_or_else(na),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generation: u64,
    granularity: Option<Granularity>,
    loading: bool,
    error: Option<&'a str>,
    pairs: Vec<&'a TradingPairResult>,
}

fn visible<'a>(snapshot: &'a ScanSnapshot, opts: RenderOptions) -> Vec<&'a TradingPairResult> {
    if opts.show_all {
        snapshot.all_pairs().iter().collect()
    } else {
        snapshot.displayed()
    }
}

fn render_json(snapshot: &ScanSnapshot, opts: RenderOptions) -> Result<String> {
    let report = JsonReport {
        generation: snapshot.generation,
        granularity: snapshot.granularity(),
        loading: snapshot.is_loading(),
        error: snapshot.error(),
        pairs: visible(snapshot, opts),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn render_table(snapshot: &ScanSnapshot, opts: RenderOptions) -> String {
    match &snapshot.state {
        ScanState::Idle => UI_TEXT.idle.clone(),
        ScanState::Fetching { .. } => UI_TEXT.loading.clone(),
        ScanState::Failed { error, .. } => format!("{} {}", UI_TEXT.batch_failed, error),
        ScanState::Ready {
            granularity,
            failed,
            ..
        } => {
            let pairs = visible(snapshot, opts);
            if pairs.is_empty() {
                return UI_TEXT.no_pairs.clone();
            }

            let rows: Vec<PairRow> = pairs.into_iter().map(PairRow::from).collect();
            let count = rows.len();
            let mut table = Table::new(rows);
            table.with(Style::rounded());

            let mut out = format!("{}\n", table);
            out.push_str(&format!(
                "{} {} pairs ({} candles",
                UI_TEXT.displaying_prefix,
                count,
                granularity.label()
            ));
            if *failed > 0 {
                out.push_str(&format!(", {} symbols unavailable", failed));
            }
            out.push(')');
            out
        }
    }
}

/// Renders one snapshot for the terminal: a status line, or the results table with its footer.
pub fn render_snapshot(snapshot: &ScanSnapshot, opts: RenderOptions) -> Result<String> {
    if opts.json {
        render_json(snapshot, opts)
    } else {
        Ok(render_table(snapshot, opts))
    }
}
