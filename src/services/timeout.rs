use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::filters::CandidateQuery;
use crate::models::{CandidateRow, CanonicalPair, GeoPoint, MatchRecord, NewProfile, UserId};
use crate::services::store::{MatchStore, StoreError};

/// Storage wrapper enforcing a deadline on every call
///
/// An expired call is reported as `StoreError::Timeout`; it is never retried.
pub struct TimeoutStore {
    inner: Arc<dyn MatchStore>,
    limit: Duration,
}

impl TimeoutStore {
    pub fn new(inner: Arc<dyn MatchStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>> + Send,
    {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Storage call exceeded {:?}", self.limit);
                Err(StoreError::Timeout(self.limit))
            }
        }
    }
}

#[async_trait]
impl MatchStore for TimeoutStore {
    async fn insert_profile(&self, profile: NewProfile) -> Result<UserId, StoreError> {
        self.bounded(self.inner.insert_profile(profile)).await
    }

    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRow>, StoreError> {
        self.bounded(self.inner.fetch_candidates(query)).await
    }

    async fn fetch_requester_location(&self, user_id: UserId) -> Result<Option<GeoPoint>, StoreError> {
        self.bounded(self.inner.fetch_requester_location(user_id)).await
    }

    async fn insert_swipe(&self, swiper: UserId, target: UserId, liked: bool) -> Result<(), StoreError> {
        self.bounded(self.inner.insert_swipe(swiper, target, liked)).await
    }

    async fn has_liked(&self, swiper: UserId, target: UserId) -> Result<bool, StoreError> {
        self.bounded(self.inner.has_liked(swiper, target)).await
    }

    async fn find_canonical_match(&self, pair: CanonicalPair) -> Result<Option<MatchRecord>, StoreError> {
        self.bounded(self.inner.find_canonical_match(pair)).await
    }

    async fn insert_match_if_absent(&self, pair: CanonicalPair) -> Result<MatchRecord, StoreError> {
        self.bounded(self.inner.insert_match_if_absent(pair)).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.bounded(self.inner.ping()).await
    }
}
