//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/read/delete APIs over `users` storage.
//! - Keep date encoding inside the persistence boundary.
//!
//! # Invariants
//! - `users.id` is unique; a second insert with the same id is a constraint
//!   violation, never an upsert.
//! - Deleting users never touches `trackings`.

use super::{RepoError, RepoResult};
use crate::model::user::{User, UserId};
use rusqlite::{params, Connection, Row};
use time::Date;

const USER_SELECT_SQL: &str = "SELECT id, subscribe FROM users";

/// Repository interface for user storage.
pub trait UserRepository {
    fn insert_user(&self, user: &User) -> RepoResult<()>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Lists every user by ascending id.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Deletes one user and returns the ids of the removed rows.
    fn delete_user(&self, id: UserId) -> RepoResult<Vec<UserId>>;
    /// Deletes users whose last valid day is before `date`.
    fn delete_users_expired_before(&self, date: Date) -> RepoResult<usize>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, user: &User) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO users (id, subscribe) VALUES (?1, ?2);",
            params![user.id, user.subscribe],
        )?;
        Ok(())
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<Vec<UserId>> {
        let mut stmt = self
            .conn
            .prepare("DELETE FROM users WHERE id = ?1 RETURNING id;")?;
        let deleted = stmt
            .query_map([id], |row| row.get::<_, UserId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(deleted)
    }

    fn delete_users_expired_before(&self, date: Date) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM users WHERE subscribe < ?1;", [date])?;
        Ok(removed)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id: UserId = row.get("id")?;
    let subscribe = row.get::<_, Date>("subscribe").map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid subscribe date for user {id} in users.subscribe: {err}"
        ))
    })?;
    Ok(User::new(id, subscribe))
}

#[cfg(test)]
mod tests {
    use super::{SqliteUserRepository, UserRepository};
    use crate::db::migrations::apply_migrations;
    use crate::model::user::User;
    use crate::repo::RepoError;
    use rusqlite::Connection;
    use time::{Date, Month};

    fn migrated() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    fn day(d: u8) -> Date {
        Date::from_calendar_date(2026, Month::October, d).unwrap()
    }

    #[test]
    fn subscribe_is_stored_as_iso_date_text() {
        let conn = migrated();
        let repo = SqliteUserRepository::new(&conn);
        repo.insert_user(&User::new(7, day(22))).unwrap();

        let stored: String = conn
            .query_row("SELECT subscribe FROM users WHERE id = 7;", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(stored, "2026-10-22");
    }

    #[test]
    fn duplicate_insert_is_constraint_violation() {
        let conn = migrated();
        let repo = SqliteUserRepository::new(&conn);
        repo.insert_user(&User::new(7, day(22))).unwrap();

        let err = repo.insert_user(&User::new(7, day(25))).unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(err.is_store_failure());
    }

    #[test]
    fn delete_returns_removed_ids_only_when_row_exists() {
        let conn = migrated();
        let repo = SqliteUserRepository::new(&conn);
        repo.insert_user(&User::new(7, day(22))).unwrap();

        assert!(repo.delete_user(8).unwrap().is_empty());
        assert_eq!(repo.delete_user(7).unwrap(), vec![7]);
        assert!(repo.get_user(7).unwrap().is_none());
    }

    #[test]
    fn expired_sweep_keeps_users_valid_on_cutoff_day() {
        let conn = migrated();
        let repo = SqliteUserRepository::new(&conn);
        repo.insert_user(&User::new(1, day(18))).unwrap();
        repo.insert_user(&User::new(2, day(19))).unwrap();
        repo.insert_user(&User::new(3, day(20))).unwrap();

        assert_eq!(repo.delete_users_expired_before(day(19)).unwrap(), 1);
        let ids: Vec<_> = repo.list_users().unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn corrupted_subscribe_value_is_rejected_on_read() {
        let conn = migrated();
        conn.execute(
            "INSERT INTO users (id, subscribe) VALUES (9, 'not-a-date');",
            [],
        )
        .unwrap();

        let err = SqliteUserRepository::new(&conn).get_user(9).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
        assert!(!err.is_store_failure());
    }
}
