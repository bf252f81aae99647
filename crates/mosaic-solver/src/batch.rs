use std::sync::Arc;

use mosaic_client::{Fragment, FragmentFetcher};
use tokio::task::{JoinError, JoinSet};
use tracing::debug;

/// Public struct `BatchExecutor` used across Mosaic components.
///
/// Fans one fetch task out per identifier on a [`JoinSet`], never holding
/// more than the configured number of requests in flight.
pub struct BatchExecutor {
    fetcher: Arc<dyn FragmentFetcher>,
    max_in_flight: usize,
}

impl BatchExecutor {
    pub fn new(fetcher: Arc<dyn FragmentFetcher>, max_in_flight: usize) -> Self {
        Self {
            fetcher,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Probes every identifier in `ids` concurrently and returns the
    /// fragments that resolved, in completion order.
    ///
    /// Waits for all dispatched probes to settle; a slow or timed-out probe
    /// resolves to absent without cancelling its siblings. Absent outcomes
    /// and panicked probe tasks are dropped silently.
    pub async fn fetch_batch(&self, ids: &[u64]) -> Vec<Fragment> {
        let mut tasks = JoinSet::new();
        let mut found = Vec::new();

        for &id in ids {
            if tasks.len() >= self.max_in_flight {
                if let Some(joined) = tasks.join_next().await {
                    collect_outcome(joined, &mut found);
                }
            }
            let fetcher = self.fetcher.clone();
            tasks.spawn(async move { fetcher.fetch(id).await });
        }

        while let Some(joined) = tasks.join_next().await {
            collect_outcome(joined, &mut found);
        }

        found
    }
}

fn collect_outcome(joined: Result<Option<Fragment>, JoinError>, found: &mut Vec<Fragment>) {
    match joined {
        Ok(Some(fragment)) => found.push(fragment),
        Ok(None) => {}
        Err(error) => debug!(%error, "fragment probe task failed to join"),
    }
}
