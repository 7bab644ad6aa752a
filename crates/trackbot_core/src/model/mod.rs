//! Domain model for subscribed users and their product trackings.
//!
//! # Responsibility
//! - Define the records the persistence gateway reads and writes.
//! - Keep subscription date arithmetic next to the data it describes.
//!
//! # Invariants
//! - A `User` is identified by the external platform's user id.
//! - A `Tracking` references a user id without owning or requiring it.

pub mod tracking;
pub mod user;
