use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::{StreamExt, future, stream};
use itertools::Itertools;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[cfg(debug_assertions)]
use crate::config::DF;
use crate::config::{BINANCE, Granularity, ScanSettings};
use crate::data::{MarketDataProvider, SymbolInfo};
use crate::domain::TradingSymbol;

use super::messages::{JobRequest, JobResult};
use super::state::{ScanSnapshot, ScanState};
use super::worker;

/// Batch orchestrator: one refresh fans out a retrieval per symbol, joins them all and
/// commits the merged result set in one step.
pub struct ScanEngine {
    provider: Arc<dyn MarketDataProvider>,
    settings: ScanSettings,

    /// Bumped by every refresh. A batch may only commit while it still holds the latest number.
    generation: AtomicU64,

    /// THE FRONT BUFFER. Always holds a fully merged snapshot; readers never see a half-built batch.
    snapshot_tx: watch::Sender<ScanSnapshot>,
}

impl ScanEngine {
    pub fn new(provider: Arc<dyn MarketDataProvider>, settings: ScanSettings) -> Self {
        let (snapshot_tx, _) = watch::channel(ScanSnapshot::default());
        Self {
            provider,
            settings,
            generation: AtomicU64::new(0),
            snapshot_tx,
        }
    }

    /// The current state as the display layer would see it.
    pub fn snapshot(&self) -> ScanSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Change feed for a display consumer: every loading transition and every committed batch.
    pub fn subscribe(&self) -> watch::Receiver<ScanSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Re-fetches every pair at `granularity` and returns the resulting snapshot.
    /// If a newer refresh started meanwhile, this batch is thrown away and the newer state is returned.
    pub async fn refresh(&self, granularity: Granularity) -> ScanSnapshot {
        let generation = self.begin(granularity);
        self.finish(generation, granularity).await
    }

    /// Numbers the batch before returning, then runs it on the runtime.
    /// Batches started one after another therefore supersede each other in call order.
    pub fn spawn_refresh(self: &Arc<Self>, granularity: Granularity) -> JoinHandle<ScanSnapshot> {
        let generation = self.begin(granularity);
        let engine = Arc::clone(self);
        tokio::spawn(async move { engine.finish(generation, granularity).await })
    }

    async fn finish(&self, generation: u64, granularity: Granularity) -> ScanSnapshot {
        let outcome = crate::trace_time!(
            format!("Refresh #{} [{}]", generation, granularity),
            10_000_000,
            { self.run_batch(generation, granularity).await }
        );

        match outcome {
            Some(state) => self.commit(generation, state),
            None => self.snapshot(),
        }
    }

    fn begin(&self, granularity: Granularity) -> u64 {
        let mut generation = 0;
        self.snapshot_tx.send_modify(|snapshot| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *snapshot = ScanSnapshot {
                generation,
                state: ScanState::Fetching { granularity },
            };
        });

        #[cfg(debug_assertions)]
        if DF.log_engine_core {
            log::info!(
                "ENGINE: batch #{} started ({})",
                generation,
                granularity.label()
            );
        }
        generation
    }

    /// Compare-and-swap on the front buffer: only the latest batch may land.
    fn commit(&self, generation: u64, state: ScanState) -> ScanSnapshot {
        let committed = self.snapshot_tx.send_if_modified(|snapshot| {
            if snapshot.generation != generation {
                return false;
            }
            *snapshot = ScanSnapshot { generation, state };
            true
        });

        if !committed {
            log::info!(
                "ENGINE: batch #{} superseded by #{}, results discarded.",
                generation,
                self.generation.load(Ordering::SeqCst)
            );
        }
        self.snapshot()
    }

    /// Returns `None` once the batch is known to be stale.
    async fn run_batch(&self, generation: u64, granularity: Granularity) -> Option<ScanState> {
        let listed = match self.provider.fetch_symbols().await {
            Ok(listed) => listed,
            Err(e) => {
                log::error!("ENGINE: symbol list unavailable: {:#}", e);
                return Some(ScanState::Failed {
                    granularity,
                    error: format!("Symbol list unavailable: {:#}", e),
                });
            }
        };

        if !self.is_current(generation) {
            return None;
        }

        let universe = self.select_universe(listed);

        #[cfg(debug_assertions)]
        if DF.log_engine_core {
            log::info!(
                "ENGINE: batch #{} fetching {} {}-quoted symbols ({} at a time).",
                generation,
                universe.len(),
                self.settings.quote_asset,
                self.settings.concurrency
            );
        }

        let provider = self.provider.as_ref();
        let settings = &self.settings;
        let jobs: Vec<JobResult> = stream::iter(universe)
            .take_while(|_: &TradingSymbol| future::ready(self.is_current(generation)))
            .map(|symbol| {
                worker::process_request(
                    provider,
                    JobRequest {
                        symbol,
                        granularity,
                    },
                    settings,
                )
            })
            .buffered(settings.concurrency.max(1))
            .collect()
            .await;

        if !self.is_current(generation) {
            return None;
        }

        let mut pairs = Vec::with_capacity(jobs.len());
        let mut failed = 0;
        for job in jobs {
            match job.result {
                Ok(pair) => pairs.push(pair),
                Err(e) => {
                    failed += 1;
                    log::warn!(
                        "{}: excluded after {}ms. {}",
                        job.symbol,
                        job.duration_ms,
                        e
                    );
                }
            }
        }

        log::info!(
            "ENGINE: batch #{} settled: {} pairs analysed, {} failed.",
            generation,
            pairs.len(),
            failed
        );

        Some(ScanState::Ready {
            granularity,
            pairs: Arc::new(pairs),
            failed,
        })
    }

    /// Quote-asset symbols in exchange order, narrowed by status, allow-list and cap.
    fn select_universe(&self, listed: Vec<SymbolInfo>) -> Vec<TradingSymbol> {
        let s = &self.settings;
        listed
            .into_iter()
            .filter(|info| info.symbol.is_quoted_in(&s.quote_asset))
            .filter(|info| {
                !s.only_trading
                    || info
                        .status
                        .as_deref()
                        .is_none_or(|status| status == BINANCE.market.trading_status)
            })
            .filter(|info| s.symbols.is_empty() || s.symbols.contains(&info.symbol.name))
            .map(|info| info.symbol)
            .unique_by(|symbol| symbol.name.clone())
            .take(s.max_pairs.unwrap_or(usize::MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceLike;
    use crate::engine::stub::{StubProvider, listed, rows, stub};
    use std::collections::HashMap;
    use std::time::Duration;

    fn engine(provider: StubProvider) -> ScanEngine {
        ScanEngine::new(Arc::new(provider), ScanSettings::default())
    }

    fn names(pairs: &[crate::models::TradingPairResult]) -> Vec<String> {
        pairs
            .iter()
            .map(|p| p.symbol.bn_name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn failed_symbols_are_dropped_and_order_is_kept() {
        let engine = engine(stub());
        let snapshot = engine.refresh(Granularity::Hour).await;

        assert!(!snapshot.is_loading());
        assert_eq!(snapshot.generation, 1);
        assert_eq!(
            names(snapshot.all_pairs()),
            vec!["AAAUSDT", "BBBUSDT", "CCCUSDT"]
        );
        match &snapshot.state {
            ScanState::Ready {
                failed,
                granularity,
                ..
            } => {
                assert_eq!(*failed, 2); // DOWN (fetch error) + BAD (no usable candle)
                assert_eq!(*granularity, Granularity::Hour);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn displayed_subset_follows_the_inclusion_rule() {
        let engine = engine(stub());
        let snapshot = engine.refresh(Granularity::Hour).await;
        let shown: Vec<String> = snapshot
            .displayed()
            .iter()
            .map(|p| p.symbol.to_string())
            .collect();
        // AAA still sits at its peak; BBB touched the band earlier; CCC never entered it before the peak
        // (30 itself is the first candle >= 29.1, so CCC is excluded too).
        assert_eq!(shown, vec!["BBB-USDT"]);

        let bbb = &snapshot.all_pairs()[1];
        assert_eq!(bbb.reference_high.value(), 15.0);
        assert_eq!(bbb.threshold_high.map(|h| h.value()), Some(14.6));
    }

    #[tokio::test]
    async fn symbol_list_failure_fails_the_batch() {
        let engine = engine(StubProvider::default());
        let snapshot = engine.refresh(Granularity::Day).await;
        assert!(!snapshot.is_loading());
        assert!(snapshot.displayed().is_empty());
        let error = snapshot.error().unwrap();
        assert!(error.contains("connection refused"), "{}", error);
        assert_eq!(snapshot.granularity(), Some(Granularity::Day));
    }

    #[tokio::test]
    async fn slow_symbol_times_out_without_blocking_the_others() {
        let mut provider = stub();
        provider
            .symbol_delay
            .insert("CCCUSDT".to_string(), Duration::from_secs(30));
        let settings = ScanSettings {
            request_timeout: Duration::from_millis(50),
            ..ScanSettings::default()
        };
        let engine = ScanEngine::new(Arc::new(provider), settings);

        let snapshot = engine.refresh(Granularity::Hour).await;
        assert_eq!(names(snapshot.all_pairs()), vec!["AAAUSDT", "BBBUSDT"]);
    }

    #[tokio::test]
    async fn stale_batch_never_overwrites_a_newer_one() {
        let mut provider = stub();
        provider
            .granularity_delay
            .insert(Granularity::Minute, Duration::from_millis(200));
        let engine = engine(provider);

        let (slow, fast) = tokio::join!(engine.refresh(Granularity::Minute), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            engine.refresh(Granularity::Day).await
        });

        assert_eq!(fast.generation, 2);
        assert_eq!(fast.granularity(), Some(Granularity::Day));
        // The slow batch finished last but was discarded: it reports the newer state.
        assert_eq!(slow.generation, 2);
        assert_eq!(slow.granularity(), Some(Granularity::Day));
        assert_eq!(engine.snapshot(), fast);
        assert!(engine.is_current(2));
    }

    #[tokio::test]
    async fn superseded_batch_stops_requesting_symbols() {
        let mut provider = stub();
        provider
            .granularity_delay
            .insert(Granularity::Minute, Duration::from_millis(100));
        let provider = Arc::new(provider);
        let settings = ScanSettings {
            concurrency: 1,
            ..ScanSettings::default()
        };
        let engine = ScanEngine::new(provider.clone(), settings);

        let (slow, fast) = tokio::join!(engine.refresh(Granularity::Minute), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            engine.refresh(Granularity::Day).await
        });

        assert_eq!(slow, fast);
        assert_eq!(fast.granularity(), Some(Granularity::Day));
        // Only the request already in flight when the newer batch began was sent.
        assert_eq!(provider.calls_at(Granularity::Minute), 1);
        assert_eq!(provider.calls_at(Granularity::Day), 5);
    }

    #[tokio::test]
    async fn spawned_refreshes_supersede_in_call_order() {
        let engine = Arc::new(engine(stub()));
        let first = engine.spawn_refresh(Granularity::Minute);
        let second = engine.spawn_refresh(Granularity::Day);
        assert!(engine.snapshot().is_loading());
        assert_eq!(engine.snapshot().generation, 2);

        let second = second.await.unwrap();
        let first = first.await.unwrap();
        assert_eq!(second.generation, 2);
        assert_eq!(second.granularity(), Some(Granularity::Day));
        assert_eq!(engine.snapshot(), second);
        assert_ne!(first.granularity(), Some(Granularity::Minute));
    }

    #[tokio::test]
    async fn refresh_is_idempotent_on_unchanged_input() {
        let engine = engine(stub());
        let first = engine.refresh(Granularity::Hour).await;
        let second = engine.refresh(Granularity::Hour).await;
        assert_eq!(first.all_pairs(), second.all_pairs());
        assert_eq!(second.generation, 2);
    }

    #[tokio::test]
    async fn subscribers_see_loading_then_ready() {
        let engine = engine(stub());
        let mut rx = engine.subscribe();
        assert_eq!(*rx.borrow_and_update(), ScanSnapshot::default());

        let snapshot = engine.refresh(Granularity::Hour).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), snapshot);
    }

    #[tokio::test]
    async fn halted_symbols_are_scanned_by_default() {
        let mut candles = HashMap::new();
        candles.insert("OLDUSDT".to_string(), rows(&[10.0, 14.6, 15.0]));
        let mut old = listed("OLD", "USDT");
        old.status = Some("BREAK".to_string());
        let provider = StubProvider {
            symbols: Some(vec![old]),
            candles,
            ..Default::default()
        };

        let engine = ScanEngine::new(Arc::new(provider), ScanSettings::default());
        let snapshot = engine.refresh(Granularity::Hour).await;
        assert_eq!(names(snapshot.all_pairs()), vec!["OLDUSDT"]);
    }

    #[tokio::test]
    async fn universe_respects_status_allow_list_and_cap() {
        let mut provider = stub();
        if let Some(symbols) = provider.symbols.as_mut() {
            symbols[0].status = Some("BREAK".to_string());
            symbols[2].status = Some("TRADING".to_string());
        }
        let settings = ScanSettings {
            only_trading: true,
            ..ScanSettings::default()
        };
        let engine = ScanEngine::new(Arc::new(provider), settings);
        let snapshot = engine.refresh(Granularity::Hour).await;
        assert_eq!(names(snapshot.all_pairs()), vec!["BBBUSDT", "CCCUSDT"]);

        let settings = ScanSettings {
            symbols: vec!["CCCUSDT".to_string(), "AAAUSDT".to_string()],
            ..ScanSettings::default()
        };
        let engine = ScanEngine::new(Arc::new(stub()), settings);
        let snapshot = engine.refresh(Granularity::Hour).await;
        assert_eq!(names(snapshot.all_pairs()), vec!["AAAUSDT", "CCCUSDT"]);

        let settings = ScanSettings {
            max_pairs: Some(2),
            ..ScanSettings::default()
        };
        let engine = ScanEngine::new(Arc::new(stub()), settings);
        let snapshot = engine.refresh(Granularity::Hour).await;
        assert_eq!(names(snapshot.all_pairs()), vec!["AAAUSDT"]);
    }

    #[tokio::test]
    async fn limit_is_passed_to_the_source() {
        let settings = ScanSettings {
            limit: 2,
            ..ScanSettings::default()
        };
        let engine = ScanEngine::new(Arc::new(stub()), settings);
        let snapshot = engine.refresh(Granularity::Hour).await;
        let aaa = &snapshot.all_pairs()[0];
        assert_eq!(aaa.candles.len(), 2);
        assert_eq!(aaa.reference_high.value(), 11.0);
    }
}
