//! Gateway functionality.
//!
//! Every request crosses the [`auth::AuthGate`] before it reaches a route.

pub mod auth;

pub use auth::{auth_middleware, AuthError, AuthGate};
