//! Configuration management for the todo API.
//!
//! Configuration is loaded from defaults, an optional config file, and
//! environment variables, then validated before the server starts.
//!
//! ```rust,ignore
//! use todo_api::config::{AppConfig, ConfigValidator};
//!
//! let config = AppConfig::load(None)?;
//! ConfigValidator::validate(&config)?;
//! ```
//!
//! # Environment
//!
//! Any field can be set as `TODO_API__<SECTION>__<KEY>`, e.g.
//! `TODO_API__STORE__CREATE_POLICY=permissive`. List fields are comma
//! separated: `TODO_API__AUTH__PUBLIC_PATHS=/,/health,/status`. The conventional variables
//! `PORT`, `HOST`, `API_KEY`/`API_TOKEN`, `DATA_FILE`, `SEED_FROM_DB` and
//! `LOG_FORMAT` are applied on top.

pub mod error;
pub mod validator;

pub use error::{ConfigResult, ConfigurationError};
pub use validator::ConfigValidator;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::store::CreatePolicy;

/// Shared secret used when neither `API_KEY` nor `API_TOKEN` is set.
pub const DEFAULT_API_KEY: &str = "secret123";

/// Seed file used when `SEED_FROM_DB=true` and no `DATA_FILE` is given.
pub const DEFAULT_SEED_FILE: &str = "db.json";

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication gate configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Todo store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load and validate configuration.
    ///
    /// Sources, later ones winning:
    /// 1. Default values
    /// 2. Config file (`config_file`, else `config/todo-api.*` if present)
    /// 3. `TODO_API__*` environment variables
    /// 4. Conventional variables (`PORT`, `API_KEY`, ...)
    pub fn load(config_file: Option<&str>) -> anyhow::Result<Self> {
        let config = Self::load_unchecked(config_file)?;

        ConfigValidator::validate(&config)
            .map_err(|e| anyhow::anyhow!("Configuration validation failed:\n\n{e}"))?;

        Ok(config)
    }

    /// Load configuration without validation.
    pub fn load_unchecked(config_file: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let file_source = match config_file {
            Some(path) => ::config::File::with_name(path).required(true),
            None => ::config::File::with_name("config/todo-api").required(false),
        };

        let config = ::config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.timeout_secs", 30)?
            .set_default("auth.api_key", DEFAULT_API_KEY)?
            .set_default("logging.level", "info")?
            .add_source(file_source)
            .add_source(Self::environment())
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.apply_env_overrides(|name| std::env::var(name).ok());

        Ok(app_config)
    }

    /// `TODO_API__<SECTION>__<KEY>` variables. List fields take comma
    /// separated values.
    fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix("TODO_API")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("auth.public_paths")
    }

    /// Apply the conventional environment variables through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(key) = lookup("API_KEY").or_else(|| lookup("API_TOKEN")) {
            self.auth.api_key = key;
        }
        if let Some(path) = lookup("DATA_FILE") {
            self.store.data_file = Some(PathBuf::from(path));
        } else if self.store.data_file.is_none()
            && lookup("SEED_FROM_DB").as_deref() == Some("true")
        {
            self.store.data_file = Some(PathBuf::from(DEFAULT_SEED_FILE));
        }
        if lookup("LOG_FORMAT").as_deref() == Some("json") {
            self.logging.json = true;
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Authentication gate configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret expected as `Authorization: Bearer <api_key>`.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Paths reachable without a token.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_public_paths() -> Vec<String> {
    vec!["/".to_string(), "/health".to_string()]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            public_paths: default_public_paths(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"<redacted>")
            .field("public_paths", &self.public_paths)
            .finish()
    }
}

impl AuthConfig {
    /// Whether the built-in development secret is in use.
    pub fn uses_default_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }
}

/// Todo store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Optional JSON file used to pre-populate the store at startup.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Validation applied on create.
    #[serde(default)]
    pub create_policy: CreatePolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to use JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
