use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid history entry at index {index}: {reason}")]
    InvalidHistoryEntry { index: usize, reason: String },
    #[error("history contains no valid events")]
    EmptyHistory,
    #[error("artifact {artifact} unavailable: {reason}")]
    MissingArtifact {
        artifact: &'static str,
        reason: String,
    },
    #[error("numeric domain error: {0}")]
    NumericDomain(String),
    #[error("catalog inconsistency: {0}")]
    CatalogInconsistency(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl EngineError {
    pub fn missing_artifact(artifact: &'static str, reason: impl ToString) -> Self {
        Self::MissingArtifact {
            artifact,
            reason: reason.to_string(),
        }
    }

    pub fn invalid_entry(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidHistoryEntry {
            index,
            reason: reason.into(),
        }
    }
}
