use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::core::clock::{Clock, SystemClock};
use crate::core::discovery::DiscoveryPipeline;
use crate::core::error::MatchmakerError;
use crate::core::filters::DiscoveryFilters;
use crate::core::resolver::MatchResolver;
use crate::core::scoring::AttractivenessRanker;
use crate::core::swipe::SwipeRecorder;
use crate::models::{Candidate, NewProfile, RankingWeights, SwipeOutcome, UserId};
use crate::services::{MatchStore, StoreError};

/// Main matchmaking orchestrator
///
/// Holds no per-request state; every handler can share one instance. The
/// requester identity is always passed in explicitly.
#[derive(Clone)]
pub struct Matchmaker {
    store: Arc<dyn MatchStore>,
    clock: Arc<dyn Clock>,
    discovery: DiscoveryPipeline,
    recorder: SwipeRecorder,
    resolver: MatchResolver,
}

impl Matchmaker {
    pub fn new(store: Arc<dyn MatchStore>, weights: RankingWeights, clock: Arc<dyn Clock>) -> Self {
        Self {
            discovery: DiscoveryPipeline::new(
                store.clone(),
                AttractivenessRanker::new(weights),
                clock.clone(),
            ),
            recorder: SwipeRecorder::new(store.clone()),
            resolver: MatchResolver::new(store.clone()),
            store,
            clock,
        }
    }

    pub fn with_defaults(store: Arc<dyn MatchStore>) -> Self {
        Self::new(store, RankingWeights::default(), Arc::new(SystemClock))
    }

    /// Persist a new profile; it is immutable afterwards
    ///
    /// # Errors
    /// `Validation` for a blank name or gender, a birth date in the future,
    /// or coordinates outside the valid latitude/longitude ranges.
    pub async fn create_profile(&self, profile: NewProfile) -> Result<UserId, MatchmakerError> {
        if profile.name.trim().is_empty() {
            return Err(MatchmakerError::Validation("name must not be empty".to_string()));
        }
        if profile.gender.trim().is_empty() {
            return Err(MatchmakerError::Validation("gender must not be empty".to_string()));
        }
        if profile.date_of_birth > self.clock.now().date_naive() {
            return Err(MatchmakerError::Validation(
                "date of birth must not be in the future".to_string(),
            ));
        }
        if let Some(point) = profile.location {
            if !(-90.0..=90.0).contains(&point.latitude) || !(-180.0..=180.0).contains(&point.longitude) {
                return Err(MatchmakerError::Validation("location out of range".to_string()));
            }
        }

        let id = self.store.insert_profile(profile).await?;

        tracing::info!("Created profile {}", id);

        Ok(id)
    }

    /// Ranked candidates for `requester`, best first
    pub async fn discover(
        &self,
        requester: UserId,
        filters: &DiscoveryFilters,
    ) -> Result<Vec<Candidate>, MatchmakerError> {
        let candidates = self.discovery.discover(requester, filters).await?;

        tracing::info!(
            "Returning {} candidates for user {}",
            candidates.len(),
            requester
        );

        Ok(candidates)
    }

    /// Ranked candidates with an explicit "now" reference
    pub async fn discover_at(
        &self,
        requester: UserId,
        now: DateTime<Utc>,
        filters: &DiscoveryFilters,
    ) -> Result<Vec<Candidate>, MatchmakerError> {
        self.discovery.discover_at(requester, now, filters).await
    }

    /// Record a swipe and report whether the pair is now matched
    ///
    /// The swipe is committed before match resolution reads it.
    pub async fn swipe(
        &self,
        requester: UserId,
        target: UserId,
        liked: bool,
    ) -> Result<SwipeOutcome, MatchmakerError> {
        self.recorder.record(requester, target, liked).await?;

        let outcome = self.resolver.resolve(requester, target).await?;

        tracing::info!(
            "Swipe {} -> {} (liked: {}) matched: {}",
            requester,
            target,
            liked,
            outcome.matched
        );

        Ok(outcome)
    }

    /// Storage health probe
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}
