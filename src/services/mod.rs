//! Business logic services.
//!
//! Services hold the logic behind the HTTP handlers: key generation,
//! persistence calls and mapping to response types.

pub mod user_service;
