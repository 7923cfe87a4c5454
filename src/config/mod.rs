//! Configuration management for PropVault
//!
//! Loads and validates configuration from environment variables, with support
//! for different environments (development, staging, production).

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend gateway (system of record)
    pub gateway_url: String,

    /// Per-request timeout applied to gateway calls
    pub gateway_timeout: Duration,

    /// Extra attempts for read requests after the first failure
    pub gateway_read_retries: u32,

    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// Where issued sessions are persisted between restarts
    pub session_file: Option<PathBuf>,

    /// How long an issued session stays valid
    pub session_ttl: chrono::Duration,

    /// CORS allowed origins, comma separated
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let gateway_url = env::var("GATEWAY_URL")
            .map_err(|_| ConfigError::MissingEnvVar("GATEWAY_URL".to_string()))?;
        let gateway_url = normalize_base_url(&gateway_url)?;

        let gateway_timeout_secs = env::var("GATEWAY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse::<u64>()
            .unwrap_or(15);

        let gateway_read_retries = env::var("GATEWAY_READ_RETRIES")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .unwrap_or(1);

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let session_file = env::var("SESSION_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()
            .map_err(|_| {
                ConfigError::InvalidValue("SESSION_TTL_HOURS must be a whole number".to_string())
            })?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            gateway_url,
            gateway_timeout: Duration::from_secs(gateway_timeout_secs),
            gateway_read_retries,
            environment,
            port,
            session_file,
            session_ttl: chrono::Duration::hours(session_ttl_hours),
            cors_allowed_origins,
            log_level,
        })
    }
}

/// Trim whitespace and trailing slashes so paths can be appended with `/`.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue(format!(
            "GATEWAY_URL must start with http:// or https://, got '{}'",
            raw
        )));
    }
    Ok(url.to_string())
}
