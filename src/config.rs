//! Application configuration loaded from environment variables.

use std::env;

use crate::models::{ApiKeyCredential, License, LicenseStatus, LicenseType};
use crate::services::api_key;
use crate::store::DEFAULT_INDEX_PREFIX;

/// HTTP header name for API key authentication.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP header name for admin key (bootstrap).
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_ADMIN_KEY: &str = "dev-admin-key-do-not-use-in-production";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const MAX_ATTEMPTS: i32 = 1;
    pub const JOB_TIMEOUT_MS: i64 = 120_000; // 2 minutes
    pub const LICENSE_TYPE: &str = "trial";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection string; reports are kept in memory when unset
    pub database_url: Option<String>,
    /// Prefix of public paths (no trailing slash)
    pub base_path: String,
    /// Prefix of report index names
    pub index_prefix: String,
    pub kibana_name: Option<String>,
    pub kibana_id: Option<String>,
    /// Version stamped into report payloads
    pub version: String,
    /// Attempts a worker may make per report
    pub max_attempts: i32,
    /// Processing timeout per attempt, in milliseconds
    pub job_timeout_ms: i64,
    /// When false every caller is anonymous
    pub security_enabled: bool,
    /// Configured API keys (hashed)
    pub api_keys: Vec<ApiKeyCredential>,
    /// Admin key for bootstrap access
    pub admin_key: Option<String>,
    /// Current license; `None` when unavailable
    pub license: Option<License>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In production mode (RUST_ENV=production):
    /// - DATABASE_URL is required
    /// - Server will NOT start if using development defaults
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `RPT_HOST`: Server host (default: 127.0.0.1)
    /// - `RPT_PORT`: Server port (default: 8080)
    /// - `DATABASE_URL`: PostgreSQL connection string (required in production)
    /// - `RPT_BASE_PATH`: Public path prefix (default: empty)
    /// - `RPT_INDEX_PREFIX`: Report index prefix (default: .reporting)
    /// - `RPT_KIBANA_NAME` / `RPT_KIBANA_ID`: Instance identification
    /// - `RPT_VERSION`: Version stamped on payloads (default: crate version)
    /// - `RPT_MAX_ATTEMPTS`: Attempts per report (default: 1)
    /// - `RPT_JOB_TIMEOUT_MS`: Per-attempt timeout (default: 120000)
    /// - `RPT_SECURITY_ENABLED`: Require API keys (default: true)
    /// - `RPT_API_KEYS`: Comma-separated `username:sha256-hex:role` entries
    /// - `RPT_ADMIN_KEY`: Admin key for bootstrap access (optional)
    /// - `RPT_LICENSE_TYPE`: basic/standard/gold/platinum/enterprise/trial, or `none` (default: trial)
    /// - `RPT_LICENSE_STATUS`: active/expired (default: active)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("RPT_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("RPT_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("RPT_PORT must be a valid port number"))?;

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let base_path = env::var("RPT_BASE_PATH")
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or_default();

        let index_prefix =
            env::var("RPT_INDEX_PREFIX").unwrap_or_else(|_| DEFAULT_INDEX_PREFIX.to_string());

        let max_attempts = env::var("RPT_MAX_ATTEMPTS")
            .unwrap_or_else(|_| defaults::MAX_ATTEMPTS.to_string())
            .parse::<i32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidValue(
                "RPT_MAX_ATTEMPTS must be a positive number",
            ))?;

        let job_timeout_ms = env::var("RPT_JOB_TIMEOUT_MS")
            .unwrap_or_else(|_| defaults::JOB_TIMEOUT_MS.to_string())
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidValue(
                "RPT_JOB_TIMEOUT_MS must be a positive number",
            ))?;

        let security_enabled = match env::var("RPT_SECURITY_ENABLED") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::InvalidValue(
                "RPT_SECURITY_ENABLED must be true or false",
            ))?,
            Err(_) => true,
        };

        let api_keys = api_key::parse_credentials(&env::var("RPT_API_KEYS").unwrap_or_default())
            .map_err(ConfigError::InvalidApiKeys)?;

        // Admin key is optional - used for bootstrap access
        let admin_key = if environment.is_development() {
            Some(env::var("RPT_ADMIN_KEY").unwrap_or_else(|_| defaults::DEV_ADMIN_KEY.to_string()))
        } else {
            env::var("RPT_ADMIN_KEY").ok()
        };

        let license = parse_license(
            &env::var("RPT_LICENSE_TYPE").unwrap_or_else(|_| defaults::LICENSE_TYPE.to_string()),
            &env::var("RPT_LICENSE_STATUS").unwrap_or_else(|_| "active".to_string()),
        )?;

        let config = Config {
            environment,
            host,
            port,
            database_url,
            base_path,
            index_prefix,
            kibana_name: env::var("RPT_KIBANA_NAME").ok(),
            kibana_id: env::var("RPT_KIBANA_ID").ok(),
            version: env::var("RPT_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            max_attempts,
            job_timeout_ms,
            security_enabled,
            api_keys,
            admin_key,
            license,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.is_none() {
            errors.push(
                "DATABASE_URL is not set. Reports would only be kept in memory.".to_string(),
            );
        }

        if let Some(ref key) = self.admin_key
            && key == defaults::DEV_ADMIN_KEY
        {
            errors.push(
                "RPT_ADMIN_KEY is using development default. Set a secure admin key or remove it."
                    .to_string(),
            );
        }

        if !self.security_enabled {
            errors.push("RPT_SECURITY_ENABLED=false is not allowed in production.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_license(license_type: &str, status: &str) -> Result<Option<License>, ConfigError> {
    if license_type.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let license_type = LicenseType::parse(license_type)
        .ok_or(ConfigError::InvalidValue("RPT_LICENSE_TYPE is not a known license type"))?;
    let status = LicenseStatus::parse(status).ok_or(ConfigError::InvalidValue(
        "RPT_LICENSE_STATUS must be 'active' or 'expired'",
    ))?;
    Ok(Some(License {
        license_type,
        status,
    }))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Invalid RPT_API_KEYS: {0}")]
    InvalidApiKeys(String),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
