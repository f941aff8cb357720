//! Configuration validation.
//!
//! Checks the loaded configuration at startup and reports every problem at
//! once, each with a hint on how to fix it.

use super::error::{ConfigResult, ConfigurationError};
use super::{AppConfig, AuthConfig, ServerConfig};

/// Configuration validator.
///
/// | Setting                | Rule                          |
/// |------------------------|-------------------------------|
/// | `auth.api_key`         | non-empty, no surrounding whitespace |
/// | `auth.public_paths`    | every entry starts with `/`   |
/// | `server.timeout_secs`  | greater than zero             |
#[derive(Debug)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the entire application configuration.
    pub fn validate(config: &AppConfig) -> ConfigResult<()> {
        let mut errors = Self::auth_errors(&config.auth);
        errors.extend(Self::server_errors(&config.server));

        match ConfigurationError::from_list(errors) {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    fn auth_errors(auth: &AuthConfig) -> Vec<ConfigurationError> {
        let mut errors = Vec::new();

        if auth.api_key.is_empty() {
            errors.push(ConfigurationError::missing_required(
                "API key",
                "Authenticating requests to protected routes",
                "API_KEY or API_TOKEN",
            ));
        } else if auth.api_key.trim() != auth.api_key {
            errors.push(ConfigurationError::invalid(
                "API key has leading or trailing whitespace",
                "Remove the whitespace from API_KEY; clients must send it verbatim after 'Bearer '",
            ));
        }

        for path in auth.public_paths.iter().filter(|p| !p.starts_with('/')) {
            errors.push(ConfigurationError::invalid(
                format!("public path '{path}' does not start with '/'"),
                format!("Use '/{path}' in auth.public_paths"),
            ));
        }

        errors
    }

    fn server_errors(server: &ServerConfig) -> Vec<ConfigurationError> {
        let mut errors = Vec::new();
        if server.timeout_secs == 0 {
            errors.push(ConfigurationError::invalid(
                "server.timeout_secs must be greater than zero",
                "Set TODO_API__SERVER__TIMEOUT_SECS to a positive number of seconds",
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_api_key_is_missing() {
        let mut config = AppConfig::default();
        config.auth.api_key = String::new();
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingRequired { .. }));
    }

    #[test]
    fn test_padded_api_key_is_invalid() {
        let mut config = AppConfig::default();
        config.auth.api_key = " padded ".to_string();
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::Invalid { .. }));
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = AppConfig::default();
        config.auth.public_paths = vec!["health".to_string()];
        config.server.timeout_secs = 0;
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(err.count(), 2);
        assert!(err.to_string().contains("/health"));
    }
}
