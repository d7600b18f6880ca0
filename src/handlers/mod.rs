//! HTTP request handlers (route handlers).

/// Health check endpoint
pub mod health;
/// User creation and lookup endpoints
pub mod users;
