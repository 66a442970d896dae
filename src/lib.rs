//! Lume Matchmaker - discovery ranking and match resolution for Lume dating app
//!
//! This library provides the matchmaking engine: a discovery pipeline that
//! filters, scores and ranks candidate profiles, and a swipe protocol that
//! turns reciprocal likes into a single durable match record.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{DiscoveryFilters, Matchmaker, MatchmakerError, distance::haversine_distance};
pub use models::{Candidate, GeoPoint, MatchRecord, SwipeOutcome, UserId};
pub use services::{MatchStore, MemoryStore, PostgresStore, StoreError};
