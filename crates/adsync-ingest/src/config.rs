//! Sync configuration
//!
//! Built once at process start and passed down by reference; nothing below
//! `main` reads the environment.

use crate::credentials;
use crate::error::IngestError;
use adsync_common::{AdsyncError, Result};
use std::str::FromStr;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Advert API endpoint returning campaigns grouped by type and status.
pub const DEFAULT_API_URL: &str = "https://advert-api.wildberries.ru/adv/v1/promotion/count";

/// Default timeout for the advert API request in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

/// Default database: a SQLite file in the working directory.
///
/// sqlx reads the part after `sqlite://` as the path, so `sqlite:///adverts.db`
/// (relative in SQLAlchemy) is the absolute path `/adverts.db` here.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://adverts.db";

/// Default time to wait for a database connection in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Advert API settings
#[derive(Clone)]
pub struct ApiConfig {
    pub url: String,
    /// Bearer token; empty when none was configured
    pub token: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.token.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("token", &token)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub connect_timeout_secs: u64,
    /// Create the adverts table before inserting
    pub auto_create_tables: bool,
}

/// Configuration for one sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
}

impl SyncConfig {
    /// Load `.env` if present, read the environment, and validate
    pub fn load() -> std::result::Result<Self, IngestError> {
        dotenvy::dotenv().ok();

        let config = Self::from_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Read configuration from environment variables
    ///
    /// - `TOKEN`: advert API token (empty if unset)
    /// - `DATABASE_URL`: SQLite connection string
    /// - `ADSYNC_API_URL`, `ADSYNC_API_TIMEOUT_SECS`
    /// - `ADSYNC_DB_CONNECT_TIMEOUT_SECS`
    /// - `ADSYNC_AUTO_CREATE_TABLES`: true/false
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api: ApiConfig {
                url: std::env::var("ADSYNC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
                token: credentials::get_token(),
                timeout_secs: env_or("ADSYNC_API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                connect_timeout_secs: env_or(
                    "ADSYNC_DB_CONNECT_TIMEOUT_SECS",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                )?,
                auto_create_tables: env_or("ADSYNC_AUTO_CREATE_TABLES", false)?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api.url.starts_with("http://") || self.api.url.starts_with("https://")) {
            return Err(AdsyncError::config(format!(
                "Advert API URL must be http(s), got '{}'",
                self.api.url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(AdsyncError::config("API timeout must be greater than 0"));
        }

        if !self.database.url.starts_with("sqlite:") {
            return Err(AdsyncError::config(format!(
                "Only SQLite databases are supported, got '{}'",
                self.database.url
            )));
        }

        if self.database.connect_timeout_secs == 0 {
            return Err(AdsyncError::config("Database connect timeout must be greater than 0"));
        }

        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                url: DEFAULT_API_URL.to_string(),
                token: String::new(),
                timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                auto_create_tables: false,
            },
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AdsyncError::config(format!("Invalid value for {}: '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}
