use crate::services::StoreError;
use thiserror::Error;

/// Errors surfaced by the matchmaking engine to its caller
///
/// Concurrent match-creation conflicts are absorbed by the resolver and
/// never appear here.
#[derive(Debug, Error)]
pub enum MatchmakerError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for MatchmakerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(what) => MatchmakerError::NotFound(what),
            other => MatchmakerError::Storage(other),
        }
    }
}
