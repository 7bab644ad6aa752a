//! Persistence gateway for users and trackings.
//!
//! # Responsibility
//! - Provide the create/read/delete operations the bot layer calls.
//! - Run each mutating operation as one transaction on a caller-owned
//!   [`Session`], committing or rolling back before returning.
//! - Turn store failures into plain outcomes (`false`, `()`, `0`).
//!
//! # Invariants
//! - Mutating operations return `Err` only for failures that indicate a bug
//!   (bad SQL, type mismatches, invalid persisted data, out-of-range dates).
//! - Read operations surface store failures as `Err`; "not found" is `None`
//!   or an empty list, never an error.
//! - Removing users never removes their trackings.

use crate::clock::{Clock, SystemClock};
use crate::db::Session;
use crate::model::tracking::{NewTracking, ProductId, Tracking};
use crate::model::user::{User, UserId};
use crate::repo::tracking_repo::{SqliteTrackingRepository, TrackingRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::RepoResult;
use log::{debug, error, info, warn};

/// Outcome of registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCreation {
    Created(User),
    /// A user with this id is already stored; the stored row is unchanged.
    AlreadyExists,
    /// The store failed for another reason and the insert was rolled back.
    StoreUnavailable,
}

impl UserCreation {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Async data-access gateway over caller-supplied sessions.
///
/// The gateway holds no connection state; every call borrows the session it
/// is given and reads the current date from its clock.
#[derive(Debug, Clone, Default)]
pub struct PersistenceGateway<C: Clock = SystemClock> {
    clock: C,
}

impl PersistenceGateway<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> PersistenceGateway<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Stores a new tracking request. Identical requests are stored again.
    ///
    /// Returns `false` when the store rejected the insert.
    pub async fn create_tracking(
        &self,
        session: &Session,
        product_id: ProductId,
        count: i64,
        user_id: UserId,
    ) -> RepoResult<bool> {
        let request = NewTracking {
            user_id,
            product_id,
            count,
        };
        let result = session
            .transaction(move |tx| SqliteTrackingRepository::new(tx).insert_tracking(&request))
            .await;

        match absorb_store_failure("tracking_create", result)? {
            Some(tracking_id) => {
                info!(
                    "event=tracking_create module=gateway status=ok user_id={} product_id={} tracking_id={}",
                    user_id, product_id, tracking_id
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Registers a user whose subscription runs `subscribe_days` days past
    /// today.
    ///
    /// Returns `false` when the user already exists or the store failed; use
    /// [`register_user`](Self::register_user) to tell those apart.
    pub async fn create_user(
        &self,
        session: &Session,
        user_id: UserId,
        subscribe_days: u32,
    ) -> RepoResult<bool> {
        Ok(self
            .register_user(session, user_id, subscribe_days)
            .await?
            .is_created())
    }

    /// Registers a user and reports why registration did not happen.
    ///
    /// # Errors
    /// - `RepoError::Validation` when the expiry date would overflow.
    pub async fn register_user(
        &self,
        session: &Session,
        user_id: UserId,
        subscribe_days: u32,
    ) -> RepoResult<UserCreation> {
        let user = User::with_subscription(user_id, self.clock.today(), subscribe_days)?;
        let stored = user.clone();
        let result = session
            .transaction(move |tx| SqliteUserRepository::new(tx).insert_user(&stored))
            .await;

        match result {
            Ok(()) => {
                info!(
                    "event=user_create module=gateway status=ok user_id={} subscribe={}",
                    user.id, user.subscribe
                );
                Ok(UserCreation::Created(user))
            }
            Err(err) if err.is_constraint_violation() => {
                debug!(
                    "event=user_create module=gateway status=exists user_id={}",
                    user_id
                );
                Ok(UserCreation::AlreadyExists)
            }
            Err(err) => {
                absorb_store_failure("user_create", Err::<(), _>(err))?;
                Ok(UserCreation::StoreUnavailable)
            }
        }
    }

    /// Returns the user with `user_id`, if stored.
    pub async fn get_user(&self, session: &Session, user_id: UserId) -> RepoResult<Option<User>> {
        session
            .read(move |conn| SqliteUserRepository::new(conn).get_user(user_id))
            .await
    }

    /// Deletes one user; their trackings stay in place.
    ///
    /// Commits even when no row matched. Returns `true` iff a row was deleted.
    pub async fn delete_user(&self, session: &Session, user_id: UserId) -> RepoResult<bool> {
        let result = session
            .transaction(move |tx| SqliteUserRepository::new(tx).delete_user(user_id))
            .await;

        let deleted = absorb_store_failure("user_delete", result)?
            .is_some_and(|removed| !removed.is_empty());
        info!(
            "event=user_delete module=gateway status=ok user_id={} deleted={}",
            user_id, deleted
        );
        Ok(deleted)
    }

    /// Lists every user by ascending id.
    pub async fn list_users(&self, session: &Session) -> RepoResult<Vec<User>> {
        session
            .read(|conn| SqliteUserRepository::new(conn).list_users())
            .await
    }

    /// Deletes every user whose subscription ended before today.
    ///
    /// Trackings of removed users are left behind; see
    /// [`purge_orphaned_trackings`](Self::purge_orphaned_trackings).
    pub async fn purge_expired_users(&self, session: &Session) -> RepoResult<()> {
        let today = self.clock.today();
        let result = session
            .transaction(move |tx| SqliteUserRepository::new(tx).delete_users_expired_before(today))
            .await;

        if let Some(removed) = absorb_store_failure("user_purge_expired", result)? {
            info!(
                "event=user_purge_expired module=gateway status=ok cutoff={} removed={}",
                today, removed
            );
        }
        Ok(())
    }

    /// Lists every tracking by ascending user id.
    pub async fn list_trackings(&self, session: &Session) -> RepoResult<Vec<Tracking>> {
        session
            .read(|conn| SqliteTrackingRepository::new(conn).list_trackings())
            .await
    }

    /// Lists one user's trackings in insertion order.
    pub async fn list_user_trackings(
        &self,
        session: &Session,
        user_id: UserId,
    ) -> RepoResult<Vec<Tracking>> {
        session
            .read(move |conn| SqliteTrackingRepository::new(conn).list_trackings_for_user(user_id))
            .await
    }

    /// Deletes trackings that reference users no longer stored.
    ///
    /// Returns the number of rows removed, `0` when the store failed.
    pub async fn purge_orphaned_trackings(&self, session: &Session) -> RepoResult<u64> {
        let result = session
            .transaction(|tx| SqliteTrackingRepository::new(tx).delete_orphaned_trackings())
            .await;

        let removed = absorb_store_failure("tracking_purge_orphans", result)?.unwrap_or(0) as u64;
        info!(
            "event=tracking_purge_orphans module=gateway status=ok removed={}",
            removed
        );
        Ok(removed)
    }
}

/// Maps a store failure to `Ok(None)`; other errors pass through.
///
/// The session has already rolled the transaction back by the time an error
/// reaches this point.
fn absorb_store_failure<T>(event: &'static str, result: RepoResult<T>) -> RepoResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_store_failure() => {
            warn!(
                "event={} module=gateway status=rolled_back error_code={} error={}",
                event,
                err.code(),
                err
            );
            Ok(None)
        }
        Err(err) => {
            error!(
                "event={} module=gateway status=error error_code={} error={}",
                event,
                err.code(),
                err
            );
            Err(err)
        }
    }
}
