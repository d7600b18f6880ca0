//! Data models representing database entities and API payloads.

/// User model
pub mod user;
