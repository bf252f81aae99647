use std::sync::Arc;
use std::time::Instant;

use mosaic_client::FragmentFetcher;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::{BatchExecutor, ConfigError, FragmentStore, SearchPhase, SolverConfig, SolverEvent};

type EventHandler = Arc<dyn Fn(&SolverEvent) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Public struct `SolveReport` used across Mosaic components.
///
/// On success `message` is the ordered join of fragment payloads; on an
/// exhausted search it is empty and `solved` is false. The counters and
/// elapsed time are diagnostic, not part of the functional contract.
pub struct SolveReport {
    pub message: String,
    pub solved: bool,
    pub fragments_found: usize,
    pub identifiers_probed: usize,
    pub elapsed_ms: u64,
}

/// Drives the three-phase fragment search until the message is complete or
/// the give-up budget is exhausted.
///
/// Phases run strictly one after another and every probe batch is ingested
/// before the next one is planned, so the store has a single writer and
/// needs no locking. Completeness is re-checked after every batch; the
/// instant it holds, the remaining phases are skipped.
pub struct Solver {
    executor: BatchExecutor,
    config: SolverConfig,
    handlers: Vec<EventHandler>,
}

impl Solver {
    /// Creates a solver over `fetcher`. A misconfigured `config` is rejected
    /// here, before any probe is dispatched.
    pub fn new(
        fetcher: Arc<dyn FragmentFetcher>,
        config: SolverConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let executor = BatchExecutor::new(fetcher, config.max_concurrent_requests);
        Ok(Self {
            executor,
            config,
            handlers: Vec::new(),
        })
    }

    /// Adds an event subscriber that receives solve progress callbacks.
    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&SolverEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    fn emit(&self, event: SolverEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Runs one solve attempt. Individual probe failures never abort the
    /// attempt; the only terminal failure is exhausting the give-up budget,
    /// reported as an unsuccessful result rather than an error.
    pub async fn solve(&self) -> SolveReport {
        let started = Instant::now();
        let mut store = FragmentStore::new();
        let mut probed = 0usize;

        self.emit(SolverEvent::SolveStart);

        self.run_discovery(&mut store, &mut probed).await;
        if !store.is_complete() && !store.is_empty() {
            self.run_gap_filling(&mut store, &mut probed).await;
        }
        if !store.is_complete() {
            self.run_extended_search(&mut store, &mut probed).await;
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match store.assembled_message() {
            Some(message) => {
                info!(
                    fragments = store.len(),
                    identifiers_probed = probed,
                    elapsed_ms,
                    "message assembled"
                );
                self.emit(SolverEvent::SolveSucceeded {
                    fragments: store.len(),
                    identifiers_probed: probed,
                    elapsed_ms,
                });
                SolveReport {
                    message,
                    solved: true,
                    fragments_found: store.len(),
                    identifiers_probed: probed,
                    elapsed_ms,
                }
            }
            None => {
                info!(
                    fragments = store.len(),
                    identifiers_probed = probed,
                    elapsed_ms,
                    "search abandoned before completion"
                );
                self.emit(SolverEvent::SolveAbandoned {
                    identifiers_probed: probed,
                    elapsed_ms,
                });
                SolveReport {
                    message: String::new(),
                    solved: false,
                    fragments_found: store.len(),
                    identifiers_probed: probed,
                    elapsed_ms,
                }
            }
        }
    }

    /// Dispatches one probe batch, ingests its results, and reports how many
    /// fragments the batch produced. All store mutation for the batch happens
    /// here, after the batch has fully settled.
    async fn probe(&self, store: &mut FragmentStore, probed: &mut usize, ids: &[u64]) -> usize {
        if ids.is_empty() {
            return 0;
        }

        let fragments = self.executor.fetch_batch(ids).await;
        *probed += ids.len();

        let found = fragments.len();
        for fragment in fragments {
            info!(
                id = fragment.id,
                index = fragment.index,
                "fragment discovered"
            );
            self.emit(SolverEvent::FragmentDiscovered {
                id: fragment.id,
                index: fragment.index,
                text: fragment.text.clone(),
            });
            store.insert(fragment);
        }
        found
    }

    /// Random sampling of the low identifier range. Services tend to assign
    /// small sequential identifiers, so a cheap sample reveals the message
    /// structure without committing to a full scan.
    async fn run_discovery(&self, store: &mut FragmentStore, probed: &mut usize) {
        self.emit(SolverEvent::PhaseStarted {
            phase: SearchPhase::Discovery,
        });
        info!(
            sample_size = self.config.discovery_sample_size,
            id_ceiling = self.config.discovery_id_ceiling,
            "discovery sampling started"
        );

        let mut candidates: Vec<u64> = (1..self.config.discovery_id_ceiling).collect();
        candidates.shuffle(&mut rand::thread_rng());
        candidates.truncate(self.config.discovery_sample_size.min(candidates.len()));

        for window in candidates.chunks(self.config.max_concurrent_requests) {
            self.probe(store, probed, window).await;
            if store.is_complete() {
                return;
            }
        }
    }

    /// Wide identifier scan entered when discovery left gaps. Sequence index
    /// and identifier are distinct, so gaps cannot be targeted directly; the
    /// fallback probes every not-yet-seen identifier in a larger range until
    /// the store completes or the range runs out.
    async fn run_gap_filling(&self, store: &mut FragmentStore, probed: &mut usize) {
        self.emit(SolverEvent::PhaseStarted {
            phase: SearchPhase::GapFilling,
        });
        let missing = store.missing_indices();
        info!(
            missing_indices = missing.len(),
            id_ceiling = self.config.gap_search_id_ceiling,
            "gap filling started"
        );
        debug!(?missing, "indices still absent");

        let candidates: Vec<u64> = (1..self.config.gap_search_id_ceiling)
            .filter(|id| !store.is_seen(*id))
            .collect();

        for window in candidates.chunks(self.config.max_concurrent_requests) {
            let ids: Vec<u64> = window
                .iter()
                .copied()
                .filter(|id| !store.is_seen(*id))
                .collect();
            self.probe(store, probed, &ids).await;
            if store.is_complete() {
                return;
            }
        }
    }

    /// Forward linear sweep with a consecutive-failure budget. Windows whose
    /// identifiers are all seen advance the cursor without probing and do
    /// not count toward the budget.
    async fn run_extended_search(&self, store: &mut FragmentStore, probed: &mut usize) {
        self.emit(SolverEvent::PhaseStarted {
            phase: SearchPhase::ExtendedSearch,
        });
        info!(
            give_up_threshold = self.config.give_up_threshold,
            "extended forward sweep started"
        );

        let window_len = self.config.max_concurrent_requests as u64;
        let mut cursor: u64 = 1;
        let mut consecutive_empty: u32 = 0;

        while !store.is_complete() && consecutive_empty < self.config.give_up_threshold {
            let ids: Vec<u64> = (cursor..cursor + window_len)
                .filter(|id| !store.is_seen(*id))
                .collect();
            cursor += window_len;

            if ids.is_empty() {
                continue;
            }

            let found = self.probe(store, probed, &ids).await;
            if found == 0 {
                consecutive_empty += 1;
                debug!(cursor, consecutive_empty, "empty probe window");
            } else {
                consecutive_empty = 0;
            }
        }
    }
}
