//! Use-case services exposed to the bot layer.
//!
//! # Responsibility
//! - Own transaction boundaries and failure policy for storage operations.
//! - Delegate SQL to repository implementations.

pub mod gateway;
