// Unit tests for Lume Matchmaker

use chrono::NaiveDate;
use lume_matchmaker::core::{
    age_on, calculate_attractiveness_score, distance_between, haversine_distance, normalize,
    AttractivenessRanker, CandidateQuery, DiscoveryFilters, MinMax,
};
use lume_matchmaker::models::{CandidateRow, DiscoverQuery, GeoPoint, RankingWeights};
use std::collections::HashSet;

fn candidate_row(id: i64, location: Option<GeoPoint>, like_count: u64) -> CandidateRow {
    CandidateRow {
        id,
        name: format!("User {}", id),
        gender: "female".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1992, 7, 15).unwrap(),
        location,
        like_count,
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(40.7128, -74.0060, 40.7128, -74.0060);
    assert_eq!(distance, 0.0);
}

#[test]
fn test_haversine_distance_manhattan_to_brooklyn() {
    // Manhattan to Brooklyn is approximately 5-10 km
    let manhattan_lat = 40.7580;
    let manhattan_lon = -73.9855;
    let brooklyn_lat = 40.6782;
    let brooklyn_lon = -73.9442;

    let distance = haversine_distance(manhattan_lat, manhattan_lon, brooklyn_lat, brooklyn_lon);
    assert!(distance > 5.0 && distance < 15.0);
}

#[test]
fn test_haversine_distance_symmetric_grid() {
    let mut coords = Vec::new();
    for lat in (-80..=80).step_by(40) {
        for lon in (-170..=170).step_by(85) {
            coords.push((lat as f64 + 0.25, lon as f64 - 0.5));
        }
    }

    for &(lat1, lon1) in &coords {
        for &(lat2, lon2) in &coords {
            let ab = haversine_distance(lat1, lon1, lat2, lon2);
            let ba = haversine_distance(lat2, lon2, lat1, lon1);
            assert!((ab - ba).abs() < 1e-9);
        }
    }
}

#[test]
fn test_missing_location_is_not_origin() {
    // (0, 0) is a real place; a missing location must not be treated as it
    let origin = Some(GeoPoint::new(0.0, 0.0));
    let far = Some(GeoPoint::new(40.7128, -74.0060));

    assert!(distance_between(origin, far) > 1000.0);
    assert_eq!(distance_between(None, far), 0.0);
}

#[test]
fn test_normalize_bounds() {
    for raw in [-100.0, -1.0, 0.0, 0.5, 1.0, 2.0, 100.0] {
        let value = normalize(raw, 0.0, 1.0);
        assert!((0.0..=1.0).contains(&value));
    }

    assert_eq!(normalize(42.0, 10.0, 10.0), 0.0);
    assert_eq!(normalize(42.0, 11.0, 10.0), 0.0);
}

#[test]
fn test_min_max_fold() {
    let bounds: MinMax = [89.0, 5570.0, 5837.0].into_iter().collect();

    assert_eq!(bounds.min, 89.0);
    assert_eq!(bounds.max, 5837.0);
    assert_eq!(bounds.normalize(89.0), 0.0);
    assert_eq!(bounds.normalize(5837.0), 1.0);
}

#[test]
fn test_attractiveness_weights() {
    let weights = RankingWeights::default();

    let near_unpopular = calculate_attractiveness_score(0.0, 0.0, &weights);
    let far_popular = calculate_attractiveness_score(1.0, 1.0, &weights);

    assert!(near_unpopular > far_popular);
    assert!((near_unpopular - 0.8).abs() < 1e-12);
    assert!((far_popular - 0.2).abs() < 1e-12);
}

#[test]
fn test_ranker_custom_weights() {
    // Popularity only
    let ranker = AttractivenessRanker::new(RankingWeights {
        distance: 0.0,
        likes: 1.0,
    });
    let origin = Some(GeoPoint::new(40.7128, -74.0060));
    let rows = vec![
        candidate_row(1, Some(GeoPoint::new(40.72, -74.01)), 0),
        candidate_row(2, Some(GeoPoint::new(51.5074, -0.1278)), 3),
    ];

    let ranked = ranker.rank(rows, origin, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());

    assert_eq!(ranked[0].id, 2);
    assert_eq!(ranked[0].age, 31);
}

#[test]
fn test_filters_from_query() {
    let query = DiscoverQuery {
        age: Some("29".to_string()),
        gender: Some("female".to_string()),
    };

    let filters = DiscoveryFilters::from_query(&query).unwrap();

    assert_eq!(filters.age, Some(29));
    assert_eq!(filters.gender.as_deref(), Some("female"));
}

#[test]
fn test_candidate_query_exact_age() {
    let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let filters = DiscoveryFilters {
        age: Some(29),
        gender: None,
    };
    let query = CandidateQuery::build(1, &filters, today).unwrap();
    let swiped = HashSet::new();

    for (year, month, day) in [(1994, 4, 2), (1995, 1, 1), (1995, 4, 1)] {
        let dob = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        assert_eq!(age_on(dob, today), 29);
        assert!(query.admits(2, "male", dob, &swiped), "{} should be 29", dob);
    }

    for (year, month, day) in [(1994, 4, 1), (1995, 4, 2)] {
        let dob = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        assert_ne!(age_on(dob, today), 29);
        assert!(!query.admits(2, "male", dob, &swiped), "{} should not be 29", dob);
    }
}
