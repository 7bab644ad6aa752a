//! Subscribed user model.
//!
//! # Responsibility
//! - Represent one registered user and the last day of their subscription.
//! - Compute expiry dates from a day count without overflowing.
//!
//! # Invariants
//! - `id` is the external platform's identifier, never generated here.
//! - `subscribe` is inclusive: the subscription is valid on that date.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use time::{Date, Duration};

/// External platform user identifier.
pub type UserId = i64;

/// Validation errors for user construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// `today + days` does not fit in the supported calendar range.
    ExpiryOutOfRange { today: Date, days: u32 },
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpiryOutOfRange { today, days } => write!(
                f,
                "subscription of {days} days starting {today} exceeds the supported date range"
            ),
        }
    }
}

impl Error for UserValidationError {}

/// A registered user with a subscription expiry date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Last day the subscription is valid.
    pub subscribe: Date,
}

impl User {
    pub fn new(id: UserId, subscribe: Date) -> Self {
        Self { id, subscribe }
    }

    /// Builds a user whose subscription runs for `days` days after `today`.
    ///
    /// `days == 0` yields a subscription valid through `today` only.
    pub fn with_subscription(
        id: UserId,
        today: Date,
        days: u32,
    ) -> Result<Self, UserValidationError> {
        let subscribe = today
            .checked_add(Duration::days(i64::from(days)))
            .ok_or(UserValidationError::ExpiryOutOfRange { today, days })?;
        Ok(Self { id, subscribe })
    }

    /// Returns whether the subscription covers `date`.
    pub fn is_active_on(&self, date: Date) -> bool {
        self.subscribe >= date
    }

    /// Returns whether the expired-user sweep on `date` removes this user.
    pub fn is_expired_on(&self, date: Date) -> bool {
        self.subscribe < date
    }
}
