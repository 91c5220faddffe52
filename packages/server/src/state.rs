use std::sync::Arc;
use std::time::{Instant, SystemTime};

use skilltrace_algo::{ArtifactStore, RecommendationEngine};

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    engine: RecommendationEngine<dyn ArtifactStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            engine: RecommendationEngine::new(store),
        }
    }

    pub fn engine(&self) -> &RecommendationEngine<dyn ArtifactStore> {
        &self.engine
    }

    pub fn artifacts(&self) -> &dyn ArtifactStore {
        self.engine.store()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }
}
