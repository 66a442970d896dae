use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::error::MatchmakerError;
use crate::core::filters::{fetch_candidates, CandidateQuery, DiscoveryFilters};
use crate::core::scoring::AttractivenessRanker;
use crate::models::{Candidate, UserId};
use crate::services::MatchStore;

/// Discovery pipeline
///
/// # Pipeline Stages
/// 1. Requester location lookup
/// 2. Candidate filtering (self, already swiped, exact age, gender)
/// 3. Attractiveness scoring and ranking
#[derive(Clone)]
pub struct DiscoveryPipeline {
    store: Arc<dyn MatchStore>,
    ranker: AttractivenessRanker,
    clock: Arc<dyn Clock>,
}

impl DiscoveryPipeline {
    pub fn new(store: Arc<dyn MatchStore>, ranker: AttractivenessRanker, clock: Arc<dyn Clock>) -> Self {
        Self { store, ranker, clock }
    }

    /// Ranked candidates for `requester`, aged against the injected clock
    pub async fn discover(
        &self,
        requester: UserId,
        filters: &DiscoveryFilters,
    ) -> Result<Vec<Candidate>, MatchmakerError> {
        self.discover_at(requester, self.clock.now(), filters).await
    }

    /// Ranked candidates for `requester` with an explicit "now" reference
    ///
    /// # Errors
    /// `NotFound` when the requester does not exist, `Storage` when any
    /// fetch fails. Nothing is retried.
    pub async fn discover_at(
        &self,
        requester: UserId,
        now: DateTime<Utc>,
        filters: &DiscoveryFilters,
    ) -> Result<Vec<Candidate>, MatchmakerError> {
        let today = now.date_naive();
        let query = CandidateQuery::build(requester, filters, today)?;

        let origin = self.store.fetch_requester_location(requester).await?;
        let rows = fetch_candidates(self.store.as_ref(), &query).await?;

        Ok(self.ranker.rank(rows, origin, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::models::{GeoPoint, NewProfile};
    use crate::services::MemoryStore;
    use chrono::{NaiveDate, TimeZone};

    fn profile(name: &str, gender: &str, dob: (i32, u32, u32), location: Option<GeoPoint>) -> NewProfile {
        NewProfile {
            name: name.to_string(),
            gender: gender.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(dob.0, dob.1, dob.2).unwrap(),
            location,
        }
    }

    fn pipeline(store: Arc<MemoryStore>) -> DiscoveryPipeline {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        DiscoveryPipeline::new(store, AttractivenessRanker::default(), Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn test_excludes_self_and_swiped() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_profile(profile("Alice", "female", (1990, 1, 1), None)).await.unwrap();
        let bob = store.insert_profile(profile("Bob", "male", (1985, 1, 1), None)).await.unwrap();
        let charlie = store.insert_profile(profile("Charlie", "male", (1995, 1, 1), None)).await.unwrap();
        let darren = store.insert_profile(profile("Darren", "male", (2000, 5, 4), None)).await.unwrap();
        store.insert_swipe(alice, bob, true).await.unwrap();

        let results = pipeline(store).discover(alice, &DiscoveryFilters::default()).await.unwrap();

        let ages: Vec<(i64, u32)> = results.iter().map(|c| (c.id, c.age)).collect();
        assert_eq!(ages, vec![(charlie, 29), (darren, 23)]);
    }

    #[tokio::test]
    async fn test_passed_profiles_are_hidden_too() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_profile(profile("Alice", "female", (1990, 1, 1), None)).await.unwrap();
        let bob = store.insert_profile(profile("Bob", "male", (1985, 1, 1), None)).await.unwrap();
        store.insert_swipe(alice, bob, false).await.unwrap();

        let results = pipeline(store).discover(alice, &DiscoveryFilters::default()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_requester_is_not_found() {
        let store = Arc::new(MemoryStore::new());

        let err = pipeline(store).discover(99, &DiscoveryFilters::default()).await.unwrap_err();
        assert!(matches!(err, MatchmakerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_requester_without_location_sees_zero_distances() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_profile(profile("Alice", "female", (1990, 1, 1), None)).await.unwrap();
        store
            .insert_profile(profile("Bob", "male", (1985, 1, 1), Some(GeoPoint::new(48.8566, 2.3522))))
            .await
            .unwrap();

        let results = pipeline(store).discover(alice, &DiscoveryFilters::default()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance_km, 0.0);
    }
}
