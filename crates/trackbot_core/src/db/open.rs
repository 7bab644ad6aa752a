//! Session bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections on a background thread.
//! - Configure connection settings required by core behavior.
//! - Trigger schema migrations before returning a usable session.
//!
//! # Invariants
//! - Returned sessions have `busy_timeout` set.
//! - Returned sessions have migrations fully applied.

use super::migrations::apply_migrations;
use super::session::Session;
use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{error, info};
use std::time::{Duration, Instant};
use tokio_rusqlite::Connection;

/// Opens the SQLite database named by `config` and applies pending migrations.
///
/// # Side effects
/// - Creates the database file when it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub async fn open_session(config: &StoreConfig) -> DbResult<Session> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let conn = match Connection::open(&config.database_path).await {
        Ok(conn) => conn,
        Err(err) => {
            let err = DbError::from(err);
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    finish_open(conn, config.busy_timeout(), "file", started_at).await
}

/// Opens a private in-memory database and applies all migrations.
///
/// Each call yields an independent, empty store.
pub async fn open_session_in_memory() -> DbResult<Session> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory().await {
        Ok(conn) => conn,
        Err(err) => {
            let err = DbError::from(err);
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    finish_open(
        conn,
        StoreConfig::default().busy_timeout(),
        "memory",
        started_at,
    )
    .await
}

async fn finish_open(
    conn: Connection,
    busy_timeout: Duration,
    mode: &'static str,
    started_at: Instant,
) -> DbResult<Session> {
    match bootstrap_connection(&conn, busy_timeout).await {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(Session::from_connection(conn))
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

async fn bootstrap_connection(conn: &Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.call(move |conn| Ok(configure_connection(conn, busy_timeout)))
        .await?
}

fn configure_connection(conn: &mut rusqlite::Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)
}
