// Core algorithm exports
pub mod clock;
pub mod discovery;
pub mod distance;
pub mod error;
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod resolver;
pub mod scoring;
pub mod swipe;

pub use clock::{Clock, FixedClock, SystemClock};
pub use discovery::DiscoveryPipeline;
pub use distance::{distance_between, haversine_distance};
pub use error::MatchmakerError;
pub use filters::{age_on, BirthWindow, CandidateQuery, DiscoveryFilters};
pub use matcher::Matchmaker;
pub use normalize::{normalize, MinMax};
pub use resolver::MatchResolver;
pub use scoring::{calculate_attractiveness_score, AttractivenessRanker};
pub use swipe::SwipeRecorder;
