//! Caller-owned unit-of-work handle over one SQLite connection.
//!
//! # Responsibility
//! - Run SQL work on the connection's dedicated thread, off the async executor.
//! - Provide the commit/rollback boundary used by every mutating operation.
//!
//! # Invariants
//! - A transaction opened by [`Session::transaction`] is always either
//!   committed or rolled back before the call returns.
//! - One session serves one logical caller; it is deliberately not `Clone`.

use super::{DbError, DbResult};
use log::warn;
use rusqlite::{Transaction, TransactionBehavior};
use tokio_rusqlite::Connection;

/// One logical caller's handle on the store.
///
/// The session never outlives its owner's intent: operations borrow it, and
/// only the owner may [`close`](Session::close) it.
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Wraps an already-open connection.
    ///
    /// Migrations are not applied here; use [`super::open_session`] for a
    /// bootstrapped session.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Runs read-only work against the connection.
    pub async fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DbError> + Send + 'static,
    {
        self.conn
            .call(move |conn| Ok(work(conn)))
            .await
            .map_err(|err| E::from(DbError::from(err)))?
    }

    /// Runs `work` inside an immediate transaction.
    ///
    /// Commits when `work` returns `Ok`, even if it touched no rows. Any
    /// error from `work` or from the commit itself leaves the transaction
    /// rolled back.
    pub async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DbError> + Send + 'static,
    {
        self.conn
            .call(move |conn| Ok(run_in_transaction(conn, work)))
            .await
            .map_err(|err| E::from(DbError::from(err)))?
    }

    /// Closes the underlying connection thread.
    pub async fn close(self) -> DbResult<()> {
        self.conn.close().await.map_err(DbError::from)
    }
}

fn run_in_transaction<T, E, F>(conn: &mut rusqlite::Connection, work: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<DbError>,
{
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|err| E::from(DbError::from(err)))?;

    match work(&tx) {
        // A failed commit drops `tx`, which rolls it back.
        Ok(value) => {
            tx.commit().map_err(|err| E::from(DbError::from(err)))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=session_rollback module=db status=error error={}",
                    rollback_err
                );
            }
            Err(err)
        }
    }
}
