//! Product tracking model.
//!
//! A tracking records that a user asked to watch a catalog product with a
//! quantity threshold. Duplicates are allowed; each request is its own row.

use super::user::UserId;
use serde::{Deserialize, Serialize};

/// External catalog item identifier.
pub type ProductId = i64;

/// Storage row id. Keeps duplicate requests distinct; carries no domain meaning.
pub type TrackingId = i64;

/// A tracking request before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTracking {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub count: i64,
}

/// A stored tracking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracking {
    pub id: TrackingId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub count: i64,
}

impl Tracking {
    /// Returns whether this row describes the same request as `request`.
    pub fn matches(&self, request: &NewTracking) -> bool {
        self.user_id == request.user_id
            && self.product_id == request.product_id
            && self.count == request.count
    }
}
