// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, CandidateRow, CanonicalPair, GeoPoint, MatchId, MatchRecord, NewProfile, Profile,
    RankingWeights, Swipe, SwipeOutcome, UserId,
};
pub use requests::{CreateProfileRequest, DiscoverQuery, SwipeRequest};
pub use responses::{
    CreateProfileResponse, DiscoverResponse, ErrorResponse, HealthResponse, SwipeResponse,
};
