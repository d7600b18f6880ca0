//! HTTP middleware components.
//!
//! Middleware run before route handlers and can reject a request before it
//! reaches them.

/// API key authentication middleware
pub mod auth;
