//! HTTP server setup and middleware.

use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::AppConfig;
use crate::gateway;
use crate::logging::OpTimer;
use crate::store::{seed, SeedOutcome, TodoStore};
use crate::{log_banner, log_init_step, log_init_warning, log_success, AppState};

/// Package version (from Cargo.toml).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create the application: seed the store, then assemble the router.
pub fn create_app(config: AppConfig) -> anyhow::Result<Router> {
    let overall_timer = OpTimer::new("server", "create_app");

    log_banner!(
        format!("Todo API v{VERSION}"),
        format!("Create policy: {}", config.store.create_policy)
    );

    // [1/3] Auth gate
    let step_timer = OpTimer::new("server", "auth_gate");
    log_init_step!(
        1,
        3,
        "Auth Gate",
        format!("public paths: {}", config.auth.public_paths.join(", "))
    );
    if config.auth.uses_default_key() {
        log_init_warning!("Using the default API key; set API_KEY for anything but local use");
    }
    step_timer.finish();

    // [2/3] Todo store
    let step_timer = OpTimer::new("server", "todo_store");
    let todos = TodoStore::new(config.store.create_policy);
    let outcome = seed::seed_store(&todos, config.store.data_file.as_deref());
    match &outcome {
        SeedOutcome::Disabled => {
            log_init_step!(2, 3, "Todo Store", "empty (no seed file)");
        }
        SeedOutcome::Loaded { path, report } => {
            log_init_step!(
                2,
                3,
                "Todo Store",
                format!(
                    "seeded {} todos from {} ({} skipped)",
                    outcome.loaded(),
                    path.display(),
                    report.skipped
                )
            );
        }
        SeedOutcome::Failed(e) => {
            log_init_warning!("Could not seed todos: {}", e);
            log_init_step!(2, 3, "Todo Store", "empty (seed failed)");
        }
    }
    step_timer.finish();

    // [3/3] Router
    let step_timer = OpTimer::new("server", "router");
    let state = AppState::new(config, todos);
    let app = build_router(state);
    log_init_step!(3, 3, "Router", "routes + middleware configured");
    step_timer.finish();

    overall_timer.finish();
    log_success!("Todo API created successfully");

    Ok(app)
}

/// Assemble routes and middleware around existing state.
///
/// The auth layer sits innermost so it runs after CORS preflight handling but
/// before any route extracts a body.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.timeout_secs);

    api::create_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            gateway::auth_middleware,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
