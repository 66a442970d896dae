use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::core::filters::CandidateQuery;
use crate::models::{CandidateRow, CanonicalPair, GeoPoint, MatchRecord, NewProfile, UserId};
use crate::services::store::{MatchStore, StoreError};

/// PostgreSQL storage backend
///
/// Uniqueness of the canonical `(user_low, user_high)` key is enforced by the
/// schema, so concurrent match creation for one pair yields a single row.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections.unwrap_or(10)
        );

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn match_from_row(row: &PgRow) -> Result<MatchRecord, StoreError> {
    Ok(MatchRecord {
        id: row.try_get("id")?,
        user_low: row.try_get("user_low")?,
        user_high: row.try_get("user_high")?,
    })
}

fn candidate_from_row(row: &PgRow) -> Result<CandidateRow, StoreError> {
    let like_count: i64 = row.try_get("like_count")?;
    let like_count = u64::try_from(like_count)
        .map_err(|_| StoreError::InvalidRow(format!("negative like count {}", like_count)))?;

    Ok(CandidateRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        gender: row.try_get("gender")?,
        date_of_birth: row.try_get::<NaiveDate, _>("dob")?,
        location: GeoPoint::from_parts(row.try_get("lat")?, row.try_get("lng")?),
        like_count,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[async_trait]
impl MatchStore for PostgresStore {
    async fn insert_profile(&self, profile: NewProfile) -> Result<UserId, StoreError> {
        let id: UserId = sqlx::query_scalar(
            "INSERT INTO users (name, gender, dob, lat, lng) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&profile.name)
        .bind(&profile.gender)
        .bind(profile.date_of_birth)
        .bind(profile.location.map(|p| p.latitude))
        .bind(profile.location.map(|p| p.longitude))
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created profile {} ({})", id, profile.name);

        Ok(id)
    }

    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<CandidateRow>, StoreError> {
        let sql = r#"
            SELECT
                u.id, u.name, u.gender, u.dob, u.lat, u.lng,
                (SELECT COUNT(*) FROM swipes l WHERE l.swipe_target = u.id AND l.liked) AS like_count
            FROM users u
            WHERE u.id <> $1
              AND NOT EXISTS (
                  SELECT 1 FROM swipes s WHERE s.swiper = $1 AND s.swipe_target = u.id
              )
              AND ($2::text IS NULL OR u.gender = $2)
              AND ($3::date IS NULL OR (u.dob > $3 AND u.dob <= $4))
            ORDER BY u.id
        "#;

        let window = query.birth_window;
        let rows = sqlx::query(sql)
            .bind(query.requester_id)
            .bind(query.gender.as_deref())
            .bind(window.map(|w| w.earliest_exclusive))
            .bind(window.map(|w| w.latest))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(candidate_from_row).collect()
    }

    async fn fetch_requester_location(&self, user_id: UserId) -> Result<Option<GeoPoint>, StoreError> {
        let row = sqlx::query("SELECT lat, lng FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user with ID {} not found", user_id)))?;

        Ok(GeoPoint::from_parts(row.try_get("lat")?, row.try_get("lng")?))
    }

    async fn insert_swipe(&self, swiper: UserId, target: UserId, liked: bool) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO swipes (swiper, swipe_target, liked) VALUES ($1, $2, $3)")
            .bind(swiper)
            .bind(target)
            .bind(liked)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    StoreError::NotFound(format!("swipe {} -> {} names an unknown user", swiper, target))
                } else {
                    e.into()
                }
            })?;

        tx.commit().await?;

        tracing::debug!("Recorded swipe: {} -> {} (liked: {})", swiper, target, liked);

        Ok(())
    }

    async fn has_liked(&self, swiper: UserId, target: UserId) -> Result<bool, StoreError> {
        let liked: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM swipes WHERE swiper = $1 AND swipe_target = $2 AND liked)",
        )
        .bind(swiper)
        .bind(target)
        .fetch_one(&self.pool)
        .await?;

        Ok(liked)
    }

    async fn find_canonical_match(&self, pair: CanonicalPair) -> Result<Option<MatchRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, user_low, user_high FROM matches WHERE user_low = $1 AND user_high = $2",
        )
        .bind(pair.low())
        .bind(pair.high())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(match_from_row).transpose()
    }

    async fn insert_match_if_absent(&self, pair: CanonicalPair) -> Result<MatchRecord, StoreError> {
        let query = r#"
            INSERT INTO matches (user_low, user_high)
            VALUES ($1, $2)
            ON CONFLICT (user_low, user_high) DO NOTHING
            RETURNING id, user_low, user_high
        "#;

        let inserted = sqlx::query(query)
            .bind(pair.low())
            .bind(pair.high())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict {
                        low: pair.low(),
                        high: pair.high(),
                    }
                } else {
                    e.into()
                }
            })?;

        if let Some(row) = inserted {
            return match_from_row(&row);
        }

        // Row already existed; hand back the one that won
        self.find_canonical_match(pair)
            .await?
            .ok_or(StoreError::Conflict {
                low: pair.low(),
                high: pair.high(),
            })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn test_plain_errors_are_not_foreign_key_violations() {
        assert!(!is_foreign_key_violation(&sqlx::Error::RowNotFound));
        assert!(!is_foreign_key_violation(&sqlx::Error::PoolTimedOut));
    }
}
