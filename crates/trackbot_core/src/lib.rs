//! Persistence core for the trackbot subscription bot.
//! Stores subscribed users and their product trackings in SQLite and exposes
//! them through [`PersistenceGateway`].

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, LoggingConfig, StoreConfig};
pub use db::{open_session, open_session_in_memory, DbError, DbResult, Session};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::tracking::{NewTracking, ProductId, Tracking, TrackingId};
pub use model::user::{User, UserId, UserValidationError};
pub use repo::tracking_repo::{SqliteTrackingRepository, TrackingRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::gateway::{PersistenceGateway, UserCreation};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
