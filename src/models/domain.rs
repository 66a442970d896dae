use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity of a user, as assigned by storage
pub type UserId = i64;

/// Surrogate id of a match row
pub type MatchId = i64;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Builds a point only when both halves of the coordinate are present
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some(Self::new(lat, lon)),
            _ => None,
        }
    }
}

/// Persisted user profile. Immutable after creation.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub location: Option<GeoPoint>,
}

/// Profile data supplied at creation time, before storage assigns an id
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub location: Option<GeoPoint>,
}

/// Append-only swipe record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swipe {
    pub swiper: UserId,
    pub target: UserId,
    pub liked: bool,
}

/// Unordered pair of users stored with the smaller identity first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPair {
    low: UserId,
    high: UserId,
}

impl CanonicalPair {
    /// Canonicalize `{a, b}`. Returns `None` for a self pair, which can never match.
    pub fn new(a: UserId, b: UserId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> UserId {
        self.low
    }

    pub fn high(&self) -> UserId {
        self.high
    }
}

/// Persisted mutual match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: MatchId,
    pub user_low: UserId,
    pub user_high: UserId,
}

/// Raw candidate row as fetched from storage, before ranking
#[derive(Debug, Clone)]
pub struct CandidateRow {
    pub id: UserId,
    pub name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub location: Option<GeoPoint>,
    pub like_count: u64,
}

/// Ranked projection of another user's profile, built per discovery request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: UserId,
    pub name: String,
    pub gender: String,
    pub age: u32,
    #[serde(rename = "distanceFromMe")]
    pub distance_km: f64,
    #[serde(rename = "totalLikes")]
    pub total_likes: u64,
    #[serde(rename = "normalizedDistance")]
    pub normalized_distance: f64,
    #[serde(rename = "normalizedLikes")]
    pub normalized_likes: f64,
    #[serde(rename = "attractivenessScore")]
    pub attractiveness_score: f64,
}

/// Result of a swipe once match resolution has run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeOutcome {
    pub matched: bool,
    #[serde(rename = "matchID", skip_serializing_if = "Option::is_none")]
    pub match_id: Option<MatchId>,
}

impl SwipeOutcome {
    pub fn unmatched() -> Self {
        Self {
            matched: false,
            match_id: None,
        }
    }

    pub fn matched(match_id: MatchId) -> Self {
        Self {
            matched: true,
            match_id: Some(match_id),
        }
    }
}

/// Ranking weights for the attractiveness score
#[derive(Debug, Clone, Copy)]
pub struct RankingWeights {
    pub distance: f64,
    pub likes: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            distance: 0.8,
            likes: 0.2,
        }
    }
}
