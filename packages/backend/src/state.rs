use std::sync::Arc;
use std::time::Instant;

use glossa_algo::RecallScorer;

use crate::store::LearningStore;

/// Shared application state: the trace store and the injected scorer.
///
/// The scorer is constructed once at startup and read-only afterwards;
/// nothing in the engine reaches for ambient globals.
#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    store: Arc<LearningStore>,
    scorer: Arc<RecallScorer>,
}

impl AppState {
    pub fn new(store: Arc<LearningStore>, scorer: Arc<RecallScorer>) -> Self {
        Self {
            started_at: Instant::now(),
            store,
            scorer,
        }
    }

    pub fn store(&self) -> &LearningStore {
        &self.store
    }

    pub fn scorer(&self) -> &RecallScorer {
        &self.scorer
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
