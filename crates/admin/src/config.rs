//! Configuration for the editor console, loaded from environment variables.

use secrecy::SecretString;
use thiserror::Error;

/// Minimum length for the shared editor token.
const MIN_TOKEN_LENGTH: usize = 32;

/// Values that indicate a secret was never set to a real value.
const PLACEHOLDER_PATTERNS: &[&str] = &["changeme", "change-me", "placeholder", "example", "secret"];

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// An environment variable has an invalid value.
    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: String, reason: String },
}

/// Runtime configuration for the editor console.
#[derive(Clone)]
pub struct AdminConfig {
    /// Postgres connection string.
    pub database_url: SecretString,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Shared bearer token required on every `/api` request.
    pub editor_token: SecretString,
    /// Sentry DSN, if error tracking is enabled.
    pub sentry_dsn: Option<String>,
}

impl AdminConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or fails
    /// validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("ADMIN_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".into()))?;

        let host = std::env::var("ADMIN_HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = match std::env::var("ADMIN_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                name: "ADMIN_PORT".into(),
                reason: "must be a port number".into(),
            })?,
            Err(_) => 3001,
        };

        let editor_token = std::env::var("EDITOR_TOKEN")
            .map_err(|_| ConfigError::MissingVar("EDITOR_TOKEN".into()))?;
        validate_token(&editor_token)?;

        let sentry_dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty());

        Ok(Self {
            database_url,
            host,
            port,
            editor_token: SecretString::from(editor_token),
            sentry_dsn,
        })
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("editor_token", &"[REDACTED]")
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

/// Reject tokens that are too short or look like placeholders.
fn validate_token(token: &str) -> Result<(), ConfigError> {
    if token.len() < MIN_TOKEN_LENGTH {
        return Err(ConfigError::InvalidVar {
            name: "EDITOR_TOKEN".into(),
            reason: format!("must be at least {MIN_TOKEN_LENGTH} characters"),
        });
    }

    let lower = token.to_lowercase();
    if PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Err(ConfigError::InvalidVar {
            name: "EDITOR_TOKEN".into(),
            reason: "looks like a placeholder value".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_token_rejected() {
        assert!(validate_token("tooshort").is_err());
    }

    #[test]
    fn test_placeholder_token_rejected() {
        assert!(validate_token("changeme-changeme-changeme-changeme").is_err());
    }

    #[test]
    fn test_long_random_token_accepted() {
        assert!(validate_token("kQ3vv7hZr0XeT5wLpJcY8mBdN2aFu6Gs").is_ok());
    }
}
