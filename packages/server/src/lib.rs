pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod state;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use skilltrace_algo::types::DEFAULT_THRESHOLD;
use skilltrace_algo::{ArtifactStore, FileArtifactStore};

use crate::config::Config;
use crate::state::AppState;

/// Router with the file-backed artifact store described by `config`
pub fn create_app(config: &Config) -> axum::Router {
    let store = Arc::new(FileArtifactStore::new(config.artifact_paths()));
    if config.eager_load {
        preload_artifacts(store.as_ref());
    }
    app_with_store(store)
}

/// Router over any artifact store, used by tests with in-memory catalogs
pub fn app_with_store(store: Arc<dyn ArtifactStore>) -> axum::Router {
    routes::router(AppState::new(store))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Load every artifact up front; failures are logged and retried on first request
pub fn preload_artifacts(store: &dyn ArtifactStore) {
    if let Err(err) = store.load_preprocessor() {
        tracing::warn!(error = %err, "preprocessor not preloaded");
    }
    if let Err(err) = store.load_catalog() {
        tracing::warn!(error = %err, "catalog not preloaded");
    }
    let threshold = store.load_threshold(DEFAULT_THRESHOLD);
    tracing::info!(threshold, "artifacts preloaded");
}
