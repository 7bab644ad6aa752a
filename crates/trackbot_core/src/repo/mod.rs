//! Repository layer: SQL over a borrowed connection or transaction.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from the async gateway.
//! - Classify failures so callers can tell store trouble from bugs.
//!
//! # Invariants
//! - Repositories never open or commit transactions; the caller owns the
//!   boundary.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::user::UserValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod tracking_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user and tracking persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Validation(UserValidationError),
    InvalidData(String),
}

impl RepoError {
    /// Returns `true` when the failure came from the store and should be
    /// absorbed by mutating operations after rollback.
    pub fn is_store_failure(&self) -> bool {
        match self {
            Self::Db(err) => err.is_store_failure(),
            Self::Validation(_) | Self::InvalidData(_) => false,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_constraint_violation())
    }

    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(err) => err.code(),
            Self::Validation(_) => "validation",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}
