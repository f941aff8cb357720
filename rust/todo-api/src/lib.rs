//! Todo API - token-authenticated CRUD over an in-memory todo store.
//!
//! Every request passes the [`gateway::AuthGate`] first. Admitted requests are
//! routed to exactly one [`store::TodoStore`] operation and answered as JSON.
//!
//! # Architecture
//!
//! - [`config`]: Configuration loading and validation
//! - [`gateway`]: Shared-secret bearer token authentication
//! - [`domain`]: The todo record and its request payloads
//! - [`store`]: In-memory collection and startup seeding
//! - [`api`]: HTTP endpoints and error mapping
//! - [`server`]: Router assembly and middleware
//! - [`logging`]: Tracing setup and startup log helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use todo_api::{config::AppConfig, server::create_app};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load(None)?;
//!     let addr = config.server.bind_address();
//!     let app = create_app(config)?;
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod logging;
pub mod server;
pub mod store;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::gateway::AuthGate;
use crate::store::TodoStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Authentication gate built from `config.auth`.
    pub auth: Arc<AuthGate>,
    /// The todo collection.
    pub todos: TodoStore,
}

impl AppState {
    /// Build state around an existing store.
    pub fn new(config: AppConfig, todos: TodoStore) -> Self {
        let auth = Arc::new(AuthGate::from_config(&config.auth));
        Self {
            config: Arc::new(config),
            auth,
            todos,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &"AppConfig")
            .field("auth", &self.auth)
            .field("todos", &self.todos)
            .finish()
    }
}
