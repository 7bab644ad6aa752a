//! Tracking repository contract and SQLite implementation.
//!
//! # Invariants
//! - Inserts never deduplicate.
//! - Listings order by `user_id`, then by storage id.

use super::RepoResult;
use crate::model::tracking::{NewTracking, Tracking, TrackingId};
use crate::model::user::UserId;
use rusqlite::{params, Connection, Row};

const TRACKING_SELECT_SQL: &str = "SELECT id, user_id, product_id, count FROM trackings";

/// Repository interface for tracking storage.
pub trait TrackingRepository {
    fn insert_tracking(&self, tracking: &NewTracking) -> RepoResult<TrackingId>;
    fn list_trackings(&self) -> RepoResult<Vec<Tracking>>;
    fn list_trackings_for_user(&self, user_id: UserId) -> RepoResult<Vec<Tracking>>;
    /// Deletes trackings whose user no longer exists.
    fn delete_orphaned_trackings(&self) -> RepoResult<usize>;
}

/// SQLite-backed tracking repository.
pub struct SqliteTrackingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrackingRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_trackings(&self, sql: &str, user_id: Option<UserId>) -> RepoResult<Vec<Tracking>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match user_id {
            Some(user_id) => stmt.query([user_id])?,
            None => stmt.query([])?,
        };
        let mut trackings = Vec::new();

        while let Some(row) = rows.next()? {
            trackings.push(parse_tracking_row(row)?);
        }

        Ok(trackings)
    }
}

impl TrackingRepository for SqliteTrackingRepository<'_> {
    fn insert_tracking(&self, tracking: &NewTracking) -> RepoResult<TrackingId> {
        self.conn.execute(
            "INSERT INTO trackings (user_id, product_id, count) VALUES (?1, ?2, ?3);",
            params![tracking.user_id, tracking.product_id, tracking.count],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_trackings(&self) -> RepoResult<Vec<Tracking>> {
        self.query_trackings(
            &format!("{TRACKING_SELECT_SQL} ORDER BY user_id ASC, id ASC;"),
            None,
        )
    }

    fn list_trackings_for_user(&self, user_id: UserId) -> RepoResult<Vec<Tracking>> {
        self.query_trackings(
            &format!("{TRACKING_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"),
            Some(user_id),
        )
    }

    fn delete_orphaned_trackings(&self) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM trackings
             WHERE NOT EXISTS (SELECT 1 FROM users WHERE users.id = trackings.user_id);",
            [],
        )?;
        Ok(removed)
    }
}

fn parse_tracking_row(row: &Row<'_>) -> RepoResult<Tracking> {
    Ok(Tracking {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        product_id: row.get("product_id")?,
        count: row.get("count")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{SqliteTrackingRepository, TrackingRepository};
    use crate::db::migrations::apply_migrations;
    use crate::model::tracking::NewTracking;
    use rusqlite::Connection;

    #[test]
    fn user_listing_only_returns_that_users_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let repo = SqliteTrackingRepository::new(&conn);

        for (user_id, product_id) in [(2, 10), (1, 11), (2, 12)] {
            repo.insert_tracking(&NewTracking {
                user_id,
                product_id,
                count: 1,
            })
            .unwrap();
        }

        let products: Vec<_> = repo
            .list_trackings_for_user(2)
            .unwrap()
            .into_iter()
            .map(|t| t.product_id)
            .collect();
        assert_eq!(products, vec![10, 12]);
    }
}
