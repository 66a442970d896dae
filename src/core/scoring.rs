use chrono::NaiveDate;

use crate::core::{distance::distance_between, filters::age_on, normalize::MinMax};
use crate::models::{Candidate, CandidateRow, GeoPoint, RankingWeights};

/// Calculate the attractiveness score for normalized inputs
///
/// Scoring formula:
/// score = (
///     (1 - normalized_distance) * 0.8 +   # Closer = higher score
///     normalized_likes * 0.2              # More liked = higher score
/// )
#[inline]
pub fn calculate_attractiveness_score(
    normalized_distance: f64,
    normalized_likes: f64,
    weights: &RankingWeights,
) -> f64 {
    weights.distance * (1.0 - normalized_distance) + weights.likes * normalized_likes
}

/// Ranks filtered candidate rows by proximity and popularity
#[derive(Debug, Clone, Copy, Default)]
pub struct AttractivenessRanker {
    weights: RankingWeights,
}

impl AttractivenessRanker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    /// Score and order candidates, best first
    ///
    /// # Arguments
    /// * `rows` - Candidate rows that already passed the filter
    /// * `origin` - The requester's location, if recorded
    /// * `today` - Reference date for age computation
    ///
    /// Ties keep their input order.
    pub fn rank(
        &self,
        rows: Vec<CandidateRow>,
        origin: Option<GeoPoint>,
        today: NaiveDate,
    ) -> Vec<Candidate> {
        if rows.is_empty() {
            return Vec::new();
        }

        let measured: Vec<(CandidateRow, f64)> = rows
            .into_iter()
            .map(|row| {
                let distance_km = distance_between(origin, row.location);
                (row, distance_km)
            })
            .collect();

        let distance_bounds: MinMax = measured.iter().map(|(_, distance)| *distance).collect();
        let like_bounds: MinMax = measured.iter().map(|(row, _)| row.like_count as f64).collect();

        let mut candidates: Vec<Candidate> = measured
            .into_iter()
            .map(|(row, distance_km)| {
                let normalized_distance = distance_bounds.normalize(distance_km);
                let normalized_likes = like_bounds.normalize(row.like_count as f64);

                Candidate {
                    id: row.id,
                    age: age_on(row.date_of_birth, today),
                    name: row.name,
                    gender: row.gender,
                    distance_km,
                    total_likes: row.like_count,
                    normalized_distance,
                    normalized_likes,
                    attractiveness_score: calculate_attractiveness_score(
                        normalized_distance,
                        normalized_likes,
                        &self.weights,
                    ),
                }
            })
            .collect();

        // sort_by is stable
        candidates.sort_by(|a, b| b.attractiveness_score.total_cmp(&a.attractiveness_score));

        candidates
    }
}
