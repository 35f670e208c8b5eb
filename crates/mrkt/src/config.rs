//! Configuration loading and management

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Longest accepted token lifetime: 100 years
pub const MAX_TOKEN_EXPIRY_HOURS: i64 = 100 * 365 * 24;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration
///
/// Standard and admin tokens are signed with different secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_user_secret")]
    pub user_secret: String,
    #[serde(default = "default_admin_secret")]
    pub admin_secret: String,
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_secret: default_user_secret(),
            admin_secret: default_admin_secret(),
            token_expiry_hours: default_token_expiry_hours(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "./data/mrkt.db".to_string()
}

fn default_user_secret() -> String {
    "change-me-user-secret".to_string()
}

fn default_admin_secret() -> String {
    "change-me-admin-secret".to_string()
}

fn default_token_expiry_hours() -> i64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when it is missing
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.user_secret.is_empty() || self.auth.admin_secret.is_empty() {
            bail!("Token secrets must not be empty");
        }
        if self.auth.user_secret == self.auth.admin_secret {
            bail!("auth.user_secret and auth.admin_secret must differ");
        }
        if self.auth.token_expiry_hours <= 0
            || self.auth.token_expiry_hours > MAX_TOKEN_EXPIRY_HOURS
        {
            bail!(
                "auth.token_expiry_hours must be between 1 and {}, got {}",
                MAX_TOKEN_EXPIRY_HOURS,
                self.auth.token_expiry_hours
            );
        }

        if self.auth.user_secret == default_user_secret()
            || self.auth.admin_secret == default_admin_secret()
        {
            warn!("Using a default token secret; set MRKT_USER_SECRET and MRKT_ADMIN_SECRET");
        }

        Ok(())
    }
}
