use std::sync::Arc;

use crate::core::error::MatchmakerError;
use crate::models::{CanonicalPair, SwipeOutcome, UserId};
use crate::services::{MatchStore, StoreError};

/// Turns reciprocal likes into a single canonical match row
///
/// Per pair the states are: no swipe, one-sided like, matched (terminal).
/// Must run after the triggering swipe has been committed.
#[derive(Clone)]
pub struct MatchResolver {
    store: Arc<dyn MatchStore>,
}

impl MatchResolver {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Resolve the match state of `{a, b}`
    ///
    /// Idempotent: once a match exists every call returns its id. When two
    /// callers race to create the row, the loser re-reads and returns the
    /// winner's id.
    pub async fn resolve(&self, a: UserId, b: UserId) -> Result<SwipeOutcome, MatchmakerError> {
        let Some(pair) = CanonicalPair::new(a, b) else {
            return Ok(SwipeOutcome::unmatched());
        };

        if let Some(existing) = self.store.find_canonical_match(pair).await? {
            return Ok(SwipeOutcome::matched(existing.id));
        }

        if !self.is_mutual_like(pair).await? {
            return Ok(SwipeOutcome::unmatched());
        }

        match self.store.insert_match_if_absent(pair).await {
            Ok(record) => {
                tracing::info!(
                    "Created match {} for users {} and {}",
                    record.id,
                    pair.low(),
                    pair.high()
                );
                Ok(SwipeOutcome::matched(record.id))
            }
            Err(StoreError::Conflict { low, high }) => {
                tracing::warn!("Lost match creation race for ({}, {}), re-reading", low, high);
                match self.store.find_canonical_match(pair).await? {
                    Some(existing) => Ok(SwipeOutcome::matched(existing.id)),
                    None => Err(MatchmakerError::Storage(StoreError::Conflict { low, high })),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn is_mutual_like(&self, pair: CanonicalPair) -> Result<bool, StoreError> {
        Ok(self.store.has_liked(pair.low(), pair.high()).await?
            && self.store.has_liked(pair.high(), pair.low()).await?)
    }
}
