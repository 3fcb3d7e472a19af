use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::Granularity;
use crate::engine::ScanEngine;
use crate::ui::{RenderOptions, is_quit, render_snapshot};

/// Interactive loop: every granularity token read from `input` starts a new refresh and every
/// committed snapshot is rendered through `emit`. Superseded batches never reach `emit`.
///
/// `q` returns at once. End of input waits for the newest refresh to land and emits it first.
pub async fn run_watch<R, F>(
    engine: Arc<ScanEngine>,
    granularity: Granularity,
    input: R,
    opts: RenderOptions,
    mut emit: F,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(String),
{
    let mut updates = engine.subscribe();
    let mut latest = engine.spawn_refresh(granularity);
    let mut lines = input.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let token = line.trim();
                if token.is_empty() {
                    continue;
                }
                if is_quit(token) {
                    return Ok(());
                }
                match token.parse::<Granularity>() {
                    Ok(granularity) => latest = engine.spawn_refresh(granularity),
                    Err(e) => log::warn!("{}", e),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = updates.borrow_and_update().clone();
                emit(render_snapshot(&snapshot, opts)?);
            }
        }
    }

    latest.await.context("Refresh task failed")?;
    if updates.has_changed().unwrap_or(false) {
        let snapshot = updates.borrow_and_update().clone();
        emit(render_snapshot(&snapshot, opts)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanSettings;
    use crate::engine::stub::stub;
    use std::time::Duration;

    fn engine_with_delay(granularity: Granularity, delay: Duration) -> Arc<ScanEngine> {
        let mut provider = stub();
        provider.granularity_delay.insert(granularity, delay);
        Arc::new(ScanEngine::new(Arc::new(provider), ScanSettings::default()))
    }

    #[tokio::test]
    async fn end_of_input_waits_for_the_newest_refresh() {
        let engine = engine_with_delay(Granularity::Day, Duration::from_millis(50));
        let mut out = Vec::new();

        run_watch(
            engine.clone(),
            Granularity::Hour,
            &b"1d\n"[..],
            RenderOptions::default(),
            |text| out.push(text),
        )
        .await
        .unwrap();

        let last = out.last().unwrap();
        assert!(last.contains("BBB-USDT"), "{}", last);
        assert!(last.contains("1 day candles"), "{}", last);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.generation, 2);
        assert!(!snapshot.is_loading());
    }

    #[tokio::test]
    async fn quit_returns_without_waiting() {
        let engine = engine_with_delay(Granularity::Hour, Duration::from_secs(30));

        let finished = tokio::time::timeout(
            Duration::from_secs(1),
            run_watch(
                engine.clone(),
                Granularity::Hour,
                &b"q\n1d\n"[..],
                RenderOptions::default(),
                |_| {},
            ),
        )
        .await;

        assert!(finished.unwrap().is_ok());
        assert_eq!(engine.snapshot().generation, 1);
    }

    #[tokio::test]
    async fn unknown_tokens_are_ignored() {
        let engine = engine_with_delay(Granularity::Hour, Duration::from_millis(10));

        run_watch(
            engine.clone(),
            Granularity::Hour,
            &b"5m\n\n"[..],
            RenderOptions::default(),
            |_| {},
        )
        .await
        .unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.granularity(), Some(Granularity::Hour));
        assert!(!snapshot.is_loading());
    }
}
