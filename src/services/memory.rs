use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::core::filters::CandidateQuery;
use crate::models::{
    CandidateRow, CanonicalPair, GeoPoint, MatchRecord, NewProfile, Profile, Swipe, UserId,
};
use crate::services::store::{MatchStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<Profile>,
    swipes: Vec<Swipe>,
    matches: Vec<MatchRecord>,
    next_profile_id: UserId,
    next_match_id: i64,
}

/// In-process storage backend
///
/// Every operation takes the table lock once, so each call is atomic the
/// same way a single SQL statement or transaction would be. Used by tests
/// and local development; nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored match rows for `pair`
    pub async fn match_rows(&self, pair: CanonicalPair) -> usize {
        let tables = self.tables.read().await;
        tables
            .matches
            .iter()
            .filter(|m| m.user_low == pair.low() && m.user_high == pair.high())
            .count()
    }

    pub async fn swipe_count(&self) -> usize {
        self.tables.read().await.swipes.len()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    /// Ids start at 1
    async fn insert_profile(&self, profile: NewProfile) -> Result<UserId, StoreError> {
        let mut tables = self.tables.write().await;
        tables.next_profile_id += 1;
        let id = tables.next_profile_id;

        tables.profiles.push(Profile {
            id,
            name: profile.name,
            gender: profile.gender,
            date_of_birth: profile.date_of_birth,
            location: profile.location,
        });

        Ok(id)
    }

    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRow>, StoreError> {
        let tables = self.tables.read().await;

        let swiped: HashSet<UserId> = tables
            .swipes
            .iter()
            .filter(|s| s.swiper == query.requester_id)
            .map(|s| s.target)
            .collect();

        let rows = tables
            .profiles
            .iter()
            .filter(|p| query.admits(p.id, &p.gender, p.date_of_birth, &swiped))
            .map(|p| CandidateRow {
                id: p.id,
                name: p.name.clone(),
                gender: p.gender.clone(),
                date_of_birth: p.date_of_birth,
                location: p.location,
                like_count: tables
                    .swipes
                    .iter()
                    .filter(|s| s.target == p.id && s.liked)
                    .count() as u64,
            })
            .collect();

        Ok(rows)
    }

    async fn fetch_requester_location(&self, user_id: UserId) -> Result<Option<GeoPoint>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .map(|p| p.location)
            .ok_or_else(|| StoreError::NotFound(format!("user with ID {} not found", user_id)))
    }

    async fn insert_swipe(&self, swiper: UserId, target: UserId, liked: bool) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        // Same outcome as the foreign keys on the swipes table
        for id in [swiper, target] {
            if !tables.profiles.iter().any(|p| p.id == id) {
                return Err(StoreError::NotFound(format!(
                    "swipe {} -> {} names an unknown user",
                    swiper, target
                )));
            }
        }

        tables.swipes.push(Swipe {
            swiper,
            target,
            liked,
        });
        Ok(())
    }

    async fn has_liked(&self, swiper: UserId, target: UserId) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .swipes
            .iter()
            .any(|s| s.swiper == swiper && s.target == target && s.liked))
    }

    async fn find_canonical_match(&self, pair: CanonicalPair) -> Result<Option<MatchRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .matches
            .iter()
            .find(|m| m.user_low == pair.low() && m.user_high == pair.high())
            .copied())
    }

    async fn insert_match_if_absent(&self, pair: CanonicalPair) -> Result<MatchRecord, StoreError> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .matches
            .iter()
            .find(|m| m.user_low == pair.low() && m.user_high == pair.high())
        {
            return Ok(*existing);
        }

        tables.next_match_id += 1;
        let record = MatchRecord {
            id: tables.next_match_id,
            user_low: pair.low(),
            user_high: pair.high(),
        };
        tables.matches.push(record);

        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filters::DiscoveryFilters;
    use chrono::NaiveDate;

    fn new_profile(name: &str, location: Option<GeoPoint>) -> NewProfile {
        NewProfile {
            name: name.to_string(),
            gender: "female".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            location,
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one() {
        let store = MemoryStore::new();
        assert_eq!(store.insert_profile(new_profile("Alice", None)).await.unwrap(), 1);
        assert_eq!(store.insert_profile(new_profile("Bob", None)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_user_location_not_found() {
        let store = MemoryStore::new();
        let err = store.fetch_requester_location(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_swipe_naming_unknown_user_is_rejected() {
        let store = MemoryStore::new();
        let a = store.insert_profile(new_profile("Alice", None)).await.unwrap();

        let err = store.insert_swipe(a, 99, true).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = store.insert_swipe(99, a, true).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        assert_eq!(store.swipe_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_likes_are_counted_twice() {
        let store = MemoryStore::new();
        let a = store.insert_profile(new_profile("Alice", None)).await.unwrap();
        let b = store.insert_profile(new_profile("Bob", None)).await.unwrap();
        let c = store.insert_profile(new_profile("Cara", None)).await.unwrap();

        store.insert_swipe(a, c, true).await.unwrap();
        store.insert_swipe(a, c, true).await.unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let query = CandidateQuery::build(b, &DiscoveryFilters::default(), today).unwrap();
        let rows = store.fetch_candidates(&query).await.unwrap();

        let cara = rows.iter().find(|r| r.id == c).unwrap();
        assert_eq!(cara.like_count, 2);
    }

    #[tokio::test]
    async fn test_insert_match_if_absent_is_idempotent() {
        let store = MemoryStore::new();
        let pair = CanonicalPair::new(5, 2).unwrap();

        let first = store.insert_match_if_absent(pair).await.unwrap();
        let second = store.insert_match_if_absent(pair).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.user_low, 2);
        assert_eq!(first.user_high, 5);
        assert_eq!(store.match_rows(pair).await, 1);
    }
}
