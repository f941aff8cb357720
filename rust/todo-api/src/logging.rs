//! Tracing setup and startup logging helpers.
//!
//! [`init_tracing`] installs the global subscriber; [`OpTimer`] and the
//! `log_*` macros give startup phases a consistent shape in the logs.

use std::time::Instant;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Returns an error if a global
/// subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(())
}

/// Operation timer for measuring and logging execution duration.
///
/// ```rust,ignore
/// use todo_api::logging::OpTimer;
///
/// let timer = OpTimer::new("server", "todo_store");
/// // ... seed the store ...
/// timer.finish(); // Logs duration
/// ```
#[derive(Debug)]
pub struct OpTimer {
    /// Component being timed (e.g., "server").
    component: String,
    /// Operation being performed (e.g., "router").
    operation: String,
    start: Instant,
}

impl OpTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        let component = component.into();
        let operation = operation.into();

        tracing::debug!(
            component = %component,
            operation = %operation,
            "Operation started"
        );

        Self {
            component,
            operation,
            start: Instant::now(),
        }
    }

    /// Finishes the timer and logs the duration.
    pub fn finish(self) {
        let duration_ms = self.start.elapsed().as_millis();

        tracing::info!(
            component = %self.component,
            operation = %self.operation,
            duration_ms = duration_ms,
            "Operation completed"
        );
    }
}

/// Log a numbered initialization step.
///
/// ```rust,ignore
/// log_init_step!(2, 3, "Todo Store", "seeded 4 todos from db.json");
/// ```
#[macro_export]
macro_rules! log_init_step {
    ($step:expr, $total:expr, $name:expr, $detail:expr) => {
        tracing::info!(
            step = $step,
            total = $total,
            "[{}/{}] {} - {}",
            $step,
            $total,
            $name,
            $detail
        );
    };
    ($step:expr, $total:expr, $name:expr) => {
        tracing::info!(
            step = $step,
            total = $total,
            "[{}/{}] {}",
            $step,
            $total,
            $name
        );
    };
}

/// Log a warning during initialization.
#[macro_export]
macro_rules! log_init_warning {
    ($msg:expr) => {
        tracing::warn!("⚠️  {}", $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        tracing::warn!("⚠️  {}", format!($msg, $($arg)*));
    };
}

/// Log successful completion of a major phase.
#[macro_export]
macro_rules! log_success {
    ($msg:expr) => {
        tracing::info!("✅ {}", $msg);
    };
    ($msg:expr, $($arg:tt)*) => {
        tracing::info!("✅ {}", format!($msg, $($arg)*));
    };
}

/// Log a startup banner.
#[macro_export]
macro_rules! log_banner {
    ($title:expr) => {
        tracing::info!("═══════════════════════════════════════════════════");
        tracing::info!("  {}", $title);
        tracing::info!("═══════════════════════════════════════════════════");
    };
    ($title:expr, $subtitle:expr) => {
        tracing::info!("═══════════════════════════════════════════════════");
        tracing::info!("  {}", $title);
        tracing::info!("  {}", $subtitle);
        tracing::info!("═══════════════════════════════════════════════════");
    };
}
