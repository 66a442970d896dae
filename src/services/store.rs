use crate::core::filters::CandidateQuery;
use crate::models::{CandidateRow, CanonicalPair, GeoPoint, MatchRecord, NewProfile, UserId};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Another writer created the canonical match row first
    #[error("Match already exists for pair ({low}, {high})")]
    Conflict { low: UserId, high: UserId },

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Storage collaborator of the matchmaking engine
///
/// Profiles, swipes and matches are owned here; the engine never caches
/// them across requests.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Persist a new profile and return the id storage assigned to it
    async fn insert_profile(&self, profile: NewProfile) -> Result<UserId, StoreError>;

    /// Fetch every candidate row passing `query`, with its received-like count
    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRow>, StoreError>;

    /// Location of the requester, `None` when not recorded
    ///
    /// # Errors
    /// `StoreError::NotFound` when the user does not exist.
    async fn fetch_requester_location(&self, user_id: UserId) -> Result<Option<GeoPoint>, StoreError>;

    /// Append one swipe row inside a single committed transaction
    ///
    /// # Errors
    /// `StoreError::NotFound` when either user does not exist.
    async fn insert_swipe(&self, swiper: UserId, target: UserId, liked: bool) -> Result<(), StoreError>;

    /// Whether `swiper` has at least one liked swipe on `target`
    async fn has_liked(&self, swiper: UserId, target: UserId) -> Result<bool, StoreError>;

    async fn find_canonical_match(&self, pair: CanonicalPair) -> Result<Option<MatchRecord>, StoreError>;

    /// Create the match row for `pair` unless one exists, returning the row
    ///
    /// # Errors
    /// May return `StoreError::Conflict` when a concurrent writer won the
    /// unique key; callers re-read the row.
    async fn insert_match_if_absent(&self, pair: CanonicalPair) -> Result<MatchRecord, StoreError>;

    /// Health probe
    async fn ping(&self) -> Result<(), StoreError>;
}
