//! SQLite storage bootstrap, sessions and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for trackbot core.
//! - Hand callers a [`Session`] that owns one connection thread.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Sessions returned by `open_session*` have migrations fully applied.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod session;

pub use open::{open_session, open_session_in_memory};
pub use session::Session;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The session's connection thread is gone or failed to close.
    Connection(tokio_rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Returns `true` for failures raised by the store itself: constraint
    /// violations, lock contention, I/O and a closed connection.
    ///
    /// Misuse of the SQL API (bad SQL, parameter or column type mismatches)
    /// is not a store failure.
    pub fn is_store_failure(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                ErrorCode::ConstraintViolation
                    | ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::DiskFull
                    | ErrorCode::CannotOpen
                    | ErrorCode::ReadOnly
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::NotADatabase
                    | ErrorCode::OutOfMemory
                    | ErrorCode::OperationInterrupted
                    | ErrorCode::FileLockingProtocolFailed
                    | ErrorCode::PermissionDenied
            ),
            Self::Sqlite(_) => false,
            Self::Connection(_) => true,
            Self::UnsupportedSchemaVersion { .. } => false,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
        )
    }

    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) if self.is_constraint_violation() => "db_constraint",
            Self::Sqlite(_) => "db_sqlite",
            Self::Connection(_) => "db_connection",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_version",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Connection(err) => write!(f, "session connection failure: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Connection(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<tokio_rusqlite::Error> for DbError {
    fn from(value: tokio_rusqlite::Error) -> Self {
        match value {
            tokio_rusqlite::Error::Rusqlite(err) => Self::Sqlite(err),
            other => Self::Connection(other),
        }
    }
}
