//! Configuration error types with actionable user messages.

use std::fmt;

/// Configuration errors with detailed, actionable messages.
#[derive(Debug, Clone)]
pub enum ConfigurationError {
    /// Invalid configuration value.
    Invalid {
        /// What is wrong.
        message: String,
        /// How to fix it.
        fix_hint: String,
    },
    /// A required configuration is missing.
    MissingRequired {
        /// The missing setting name.
        setting: String,
        /// What feature requires this setting.
        context: String,
        /// Environment variable to set.
        env_var: String,
    },
    /// Multiple errors occurred.
    Multiple(Vec<ConfigurationError>),
}

impl std::error::Error for ConfigurationError {}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { message, fix_hint } => {
                write!(
                    f,
                    "Invalid configuration: {message}\n\nHow to fix: {fix_hint}"
                )
            }
            Self::MissingRequired {
                setting,
                context,
                env_var,
            } => {
                write!(
                    f,
                    "Missing required configuration: {setting}\n\n\
                    Required for: {context}\n\
                    Set via: {env_var}"
                )
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple configuration errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "\n{}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl ConfigurationError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid(message: impl Into<String>, fix_hint: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
            fix_hint: fix_hint.into(),
        }
    }

    /// Create a missing required configuration error.
    #[must_use]
    pub fn missing_required(
        setting: impl Into<String>,
        context: impl Into<String>,
        env_var: impl Into<String>,
    ) -> Self {
        Self::MissingRequired {
            setting: setting.into(),
            context: context.into(),
            env_var: env_var.into(),
        }
    }

    /// Collapse a list of errors: `None` when empty, the error itself when
    /// there is one, otherwise a [`Self::Multiple`].
    #[must_use]
    pub fn from_list(mut errors: Vec<ConfigurationError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => Some(errors.remove(0)),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Get the number of errors (1 for single errors, N for multiple).
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }
}

/// Result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigurationError>;
