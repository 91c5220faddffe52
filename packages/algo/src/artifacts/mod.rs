//! Artifact Store
//!
//! Lazily loaded, process-lifetime cache of the three read-only artifacts the engine consumes:
//! preprocessing state, statistics catalog and decision threshold.
//!
//! - First access loads and caches; later accesses return the cached `Arc`
//! - First load runs under a mutex, so concurrent first requests load once
//! - Nothing is ever invalidated; a new artifact version needs a restart
//! - A failed catalog/preprocessor load is not cached and is retried on the next call
//! - The threshold never fails: any read or parse problem yields the caller's default

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::error::{EngineError, Result};

pub const PREPROCESSOR_FILE: &str = "preprocessor.json";
pub const CATALOG_FILE: &str = "reco_catalog.json";
pub const THRESHOLD_FILE: &str = "threshold.json";

/// Key holding the decision threshold inside the threshold artifact
pub const THRESHOLD_KEY: &str = "best_threshold";

/// Opaque preprocessing state; the recommender only requires that it loads
#[derive(Clone, Debug, PartialEq)]
pub struct Preprocessor(Value);

impl Preprocessor {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

/// Source of the engine's read-only artifacts
pub trait ArtifactStore: Send + Sync {
    fn load_preprocessor(&self) -> Result<Arc<Preprocessor>>;

    fn load_catalog(&self) -> Result<Arc<Catalog>>;

    /// Never fails; falls back to `default`
    fn load_threshold(&self, default: f64) -> f64;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub preprocessor: PathBuf,
    pub catalog: PathBuf,
    pub threshold: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            preprocessor: dir.join(PREPROCESSOR_FILE),
            catalog: dir.join(CATALOG_FILE),
            threshold: dir.join(THRESHOLD_FILE),
        }
    }
}

/// File-backed store reading JSON artifacts from disk
#[derive(Debug)]
pub struct FileArtifactStore {
    paths: ArtifactPaths,
    preprocessor: Mutex<Option<Arc<Preprocessor>>>,
    catalog: Mutex<Option<Arc<Catalog>>>,
    threshold: Mutex<Option<f64>>,
}

impl FileArtifactStore {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            preprocessor: Mutex::new(None),
            catalog: Mutex::new(None),
            threshold: Mutex::new(None),
        }
    }
}

fn read_artifact(artifact: &'static str, path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|e| EngineError::missing_artifact(artifact, format!("{}: {e}", path.display())))
}

fn parse_threshold(bytes: &[u8], default: f64) -> std::result::Result<f64, String> {
    let doc: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    let obj = doc
        .as_object()
        .ok_or_else(|| "threshold artifact is not a JSON object".to_string())?;
    match obj.get(THRESHOLD_KEY) {
        None => Ok(default),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| format!("{THRESHOLD_KEY} is not a number: {value}")),
    }
}

impl ArtifactStore for FileArtifactStore {
    fn load_preprocessor(&self) -> Result<Arc<Preprocessor>> {
        let mut slot = self.preprocessor.lock();
        if let Some(pre) = slot.as_ref() {
            return Ok(Arc::clone(pre));
        }

        let bytes = read_artifact("preprocessor", &self.paths.preprocessor)?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| EngineError::missing_artifact("preprocessor", e))?;
        let pre = Arc::new(Preprocessor::new(value));
        *slot = Some(Arc::clone(&pre));

        tracing::info!(path = %self.paths.preprocessor.display(), "preprocessor artifact loaded");
        Ok(pre)
    }

    fn load_catalog(&self) -> Result<Arc<Catalog>> {
        let mut slot = self.catalog.lock();
        if let Some(cat) = slot.as_ref() {
            return Ok(Arc::clone(cat));
        }

        let bytes = read_artifact("catalog", &self.paths.catalog)?;
        let cat = Arc::new(Catalog::from_json_slice(&bytes)?);
        *slot = Some(Arc::clone(&cat));

        tracing::info!(
            path = %self.paths.catalog.display(),
            skills = cat.skill_count(),
            items = cat.item_count(),
            item_level = cat.has_items(),
            "catalog artifact loaded"
        );
        Ok(cat)
    }

    fn load_threshold(&self, default: f64) -> f64 {
        let mut slot = self.threshold.lock();
        if let Some(thr) = *slot {
            return thr;
        }

        let loaded = fs::read(&self.paths.threshold)
            .map_err(|e| e.to_string())
            .and_then(|bytes| parse_threshold(&bytes, default));
        let thr = match loaded {
            Ok(thr) => thr,
            Err(reason) => {
                tracing::warn!(
                    path = %self.paths.threshold.display(),
                    %reason,
                    fallback = default,
                    "threshold artifact unusable, using default"
                );
                default
            }
        };
        *slot = Some(thr);
        thr
    }
}

/// Store holding artifacts built in memory, for tests and embedding
#[derive(Clone, Debug, Default)]
pub struct InMemoryArtifactStore {
    preprocessor: Option<Arc<Preprocessor>>,
    catalog: Option<Arc<Catalog>>,
    threshold: Option<f64>,
}

impl InMemoryArtifactStore {
    /// Store with the given catalog and an empty preprocessor
    pub fn new(catalog: Catalog) -> Self {
        Self {
            preprocessor: Some(Arc::new(Preprocessor::new(Value::Null))),
            catalog: Some(Arc::new(catalog)),
            threshold: None,
        }
    }

    /// Store with nothing loaded; catalog and preprocessor lookups fail
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn load_preprocessor(&self) -> Result<Arc<Preprocessor>> {
        self.preprocessor
            .clone()
            .ok_or_else(|| EngineError::missing_artifact("preprocessor", "not provided"))
    }

    fn load_catalog(&self) -> Result<Arc<Catalog>> {
        self.catalog
            .clone()
            .ok_or_else(|| EngineError::missing_artifact("catalog", "not provided"))
    }

    fn load_threshold(&self, default: f64) -> f64 {
        self.threshold.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const CATALOG_JSON: &str = r#"{
        "skill_stats": {"Algebra": {"p_correct": 0.7}},
        "item_stats": {"p1": {"n": 40, "p_correct": 0.6, "b": -0.2}},
        "skill_to_items": {"Algebra": ["p1"]},
        "meta": {"problem_col_found": true}
    }"#;

    fn write_all(dir: &Path, threshold: Option<&str>) {
        fs::write(dir.join(CATALOG_FILE), CATALOG_JSON).unwrap();
        fs::write(dir.join(PREPROCESSOR_FILE), r#"{"columns": ["skill"]}"#).unwrap();
        if let Some(t) = threshold {
            fs::write(dir.join(THRESHOLD_FILE), t).unwrap();
        }
    }

    #[test]
    fn test_file_store_loads_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path(), Some(r#"{"best_threshold": 0.42}"#));
        let store = FileArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        let first = store.load_catalog().unwrap();
        fs::remove_file(dir.path().join(CATALOG_FILE)).unwrap();
        let second = store.load_catalog().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let pre = store.load_preprocessor().unwrap();
        assert_eq!(pre.value()["columns"][0], "skill");
        assert_eq!(store.load_threshold(0.5), 0.42);
    }

    #[test]
    fn test_missing_catalog_is_reported_and_retried() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        let err = store.load_catalog().unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingArtifact {
                artifact: "catalog",
                ..
            }
        ));

        write_all(dir.path(), None);
        assert!(store.load_catalog().is_ok());
    }

    #[test]
    fn test_threshold_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(ArtifactPaths::in_dir(dir.path()));
        assert_eq!(store.load_threshold(0.5), 0.5);

        // cached even when it was a fallback
        fs::write(dir.path().join(THRESHOLD_FILE), r#"{"best_threshold": 0.9}"#).unwrap();
        assert_eq!(store.load_threshold(0.3), 0.5);
    }

    #[test]
    fn test_threshold_parse_variants() {
        assert_eq!(parse_threshold(br#"{"best_threshold": 0.61}"#, 0.5), Ok(0.61));
        assert_eq!(parse_threshold(br#"{"other": 1}"#, 0.5), Ok(0.5));
        assert!(parse_threshold(br#"{"best_threshold": "high"}"#, 0.5).is_err());
        assert!(parse_threshold(b"[]", 0.5).is_err());
        assert!(parse_threshold(b"{", 0.5).is_err());
    }

    #[test]
    fn test_bad_threshold_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path(), Some("not json"));
        let store = FileArtifactStore::new(ArtifactPaths::in_dir(dir.path()));
        assert_eq!(store.load_threshold(0.5), 0.5);
    }

    #[test]
    fn test_concurrent_first_load_shares_one_copy() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path(), None);
        let store = Arc::new(FileArtifactStore::new(ArtifactPaths::in_dir(dir.path())));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.load_catalog().unwrap())
            })
            .collect();
        let loaded: Vec<Arc<Catalog>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for cat in &loaded[1..] {
            assert!(Arc::ptr_eq(&loaded[0], cat));
        }
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryArtifactStore::new(Catalog::default()).with_threshold(0.7);
        assert!(store.load_catalog().is_ok());
        assert!(store.load_preprocessor().is_ok());
        assert_eq!(store.load_threshold(0.5), 0.7);

        let empty = InMemoryArtifactStore::empty();
        assert!(empty.load_catalog().is_err());
        assert_eq!(empty.load_threshold(0.5), 0.5);
    }
}
