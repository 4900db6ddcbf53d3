//! Typed service configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Configuration is resolved once at startup and shared read-only for
//! the life of the process. A malformed policy string or an incomplete
//! database address aborts startup instead of surfacing per request.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::rate_limit::{Policy, PolicyParseError};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FREE_LIMIT: &str = "30/minute";
pub const DEFAULT_PAID_LIMIT: &str = "300/minute";
pub const DEFAULT_MODEL_PATH: &str = "model/pipeline.json";
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: &str = "5432";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),
    #[error("invalid {var}: {source}")]
    InvalidPolicy {
        var: &'static str,
        source: PolicyParseError,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Free-tier key; empty when the free tier is disabled.
    pub free_key: String,
    pub paid_keys: HashSet<String>,
    pub free_limit: Policy,
    pub paid_limit: Policy,
    /// Shared counter store URL; `None` selects the in-process store.
    pub rate_limit_store_url: Option<String>,
    pub model_path: PathBuf,
}

impl AppConfig {
    /// Resolve configuration from the environment.
    ///
    /// Recognized variables: `PORT`, `DATABASE_URL` (or `DB_USER` /
    /// `DB_PASS` / `DB_NAME` with optional `DB_HOST` / `DB_PORT`),
    /// `API_KEY`, `PAID_KEYS`, `FREE_LIMIT`, `PAID_LIMIT`,
    /// `RATE_LIMIT_STORE_URL`, `MODEL_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on a malformed port or policy string, or
    /// when neither a full database URL nor its required parts are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let database_url = resolve_database_url(
            env_trimmed("DATABASE_URL"),
            env_trimmed("DB_USER"),
            env_trimmed("DB_PASS"),
            env_trimmed("DB_HOST"),
            env_trimmed("DB_PORT"),
            env_trimmed("DB_NAME"),
        )?;

        Ok(Self {
            port,
            database_url,
            free_key: env_trimmed("API_KEY").unwrap_or_default(),
            paid_keys: parse_paid_keys(&std::env::var("PAID_KEYS").unwrap_or_default()),
            free_limit: parse_policy_var("FREE_LIMIT", DEFAULT_FREE_LIMIT)?,
            paid_limit: parse_policy_var("PAID_LIMIT", DEFAULT_PAID_LIMIT)?,
            rate_limit_store_url: env_trimmed("RATE_LIMIT_STORE_URL"),
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),
        })
    }
}

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Database URL precedence: an explicit full URL wins; otherwise the
/// URL is assembled from split variables, failing fast on missing
/// required parts rather than silently defaulting credentials.
pub(crate) fn resolve_database_url(
    full: Option<String>,
    user: Option<String>,
    pass: Option<String>,
    host: Option<String>,
    port: Option<String>,
    name: Option<String>,
) -> Result<String, ConfigError> {
    if let Some(url) = full {
        return Ok(url);
    }
    let user = user.ok_or(ConfigError::MissingVar("DB_USER"))?;
    let pass = pass.ok_or(ConfigError::MissingVar("DB_PASS"))?;
    let name = name.ok_or(ConfigError::MissingVar("DB_NAME"))?;
    let host = host.unwrap_or_else(|| DEFAULT_DB_HOST.to_string());
    let port = port.unwrap_or_else(|| DEFAULT_DB_PORT.to_string());
    Ok(format!("postgres://{user}:{pass}@{host}:{port}/{name}"))
}

pub(crate) fn parse_paid_keys(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_policy_var(var: &'static str, default: &str) -> Result<Policy, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|source| ConfigError::InvalidPolicy { var, source })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
