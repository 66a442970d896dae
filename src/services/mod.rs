// Service exports
pub mod auth;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod timeout;

pub use auth::{AuthError, Claims, TokenVerifier};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{MatchStore, StoreError};
pub use timeout::TimeoutStore;
