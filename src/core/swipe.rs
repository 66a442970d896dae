use std::sync::Arc;

use crate::models::UserId;
use crate::services::{MatchStore, StoreError};

/// Appends immutable swipe records
///
/// Self-swipes and repeated swipes are not rejected here; discovery hides
/// already-swiped profiles instead.
#[derive(Clone)]
pub struct SwipeRecorder {
    store: Arc<dyn MatchStore>,
}

impl SwipeRecorder {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Insert one swipe; returns once the write is committed
    pub async fn record(&self, swiper: UserId, target: UserId, liked: bool) -> Result<(), StoreError> {
        self.store.insert_swipe(swiper, target, liked).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProfile;
    use crate::services::MemoryStore;
    use chrono::NaiveDate;

    async fn store_with_users(count: usize) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for i in 1..=count {
            store
                .insert_profile(NewProfile {
                    name: format!("User {}", i),
                    gender: "male".to_string(),
                    date_of_birth: NaiveDate::from_ymd_opt(1992, 3, 14).unwrap(),
                    location: None,
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_duplicates_and_self_swipes_are_recorded() {
        let store = store_with_users(3).await;
        let recorder = SwipeRecorder::new(store.clone());

        recorder.record(1, 2, true).await.unwrap();
        recorder.record(1, 2, true).await.unwrap();
        recorder.record(3, 3, false).await.unwrap();

        assert_eq!(store.swipe_count().await, 3);
        assert!(store.has_liked(1, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_target_is_not_recorded() {
        let store = store_with_users(1).await;
        let recorder = SwipeRecorder::new(store.clone());

        let err = recorder.record(1, 42, true).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.swipe_count().await, 0);
    }
}
