//! Todo API - Main Entry Point

use std::path::PathBuf;

use clap::Parser;
use mimalloc::MiMalloc;

use todo_api::config::AppConfig;
use todo_api::logging::init_tracing;
use todo_api::server::create_app;

// Use mimalloc for better performance
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Command-line arguments. Each flag overrides the loaded configuration.
#[derive(Parser, Debug)]
#[command(name = "todo-api")]
#[command(about = "Token-authenticated in-memory todo API")]
#[command(version)]
struct Args {
    /// Host to bind to.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level.
    #[arg(long)]
    log_level: Option<String>,

    /// Config file path.
    #[arg(short, long, env = "TODO_API_CONFIG")]
    config: Option<String>,

    /// JSON file used to seed the store at startup.
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(path) = args.data_file {
        config.store.data_file = Some(path);
    }

    init_tracing(&config.logging)?;

    tracing::info!("Starting Todo API v{}", env!("CARGO_PKG_VERSION"));

    let addr = config.server.bind_address();
    let app = create_app(config)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
