//! API-key authentication and tier resolution.
//!
//! DESIGN
//! ======
//! Keys are opaque strings checked against process-wide configuration
//! loaded once at startup. The caller's tier is re-derived on every
//! request — there is no cached membership state, so a key-set change
//! takes effect on the next restart with nothing to invalidate.

use crate::config::AppConfig;
use crate::rate_limit::Policy;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing API key")]
    MissingKey,
    #[error("Invalid API key")]
    InvalidKey,
}

/// Validate a presented API key against the configured allow-set: the
/// free key (when configured) plus all paid keys. Pure check, no side
/// effects.
///
/// # Errors
///
/// Returns [`AuthError`] when the key is absent, empty, or unknown.
pub fn authenticate(config: &AppConfig, presented: Option<&str>) -> Result<(), AuthError> {
    let presented = presented.unwrap_or_default();
    if presented.is_empty() {
        return Err(AuthError::MissingKey);
    }

    let matches_free = !config.free_key.is_empty() && presented == config.free_key;
    if matches_free || config.paid_keys.contains(presented) {
        return Ok(());
    }
    Err(AuthError::InvalidKey)
}

/// Resolve the rate-limit policy for a caller. An absent key falls back
/// to the free tier; membership in the paid key set selects the paid
/// tier.
#[must_use]
pub fn resolve_tier<'a>(config: &'a AppConfig, caller_key: Option<&str>) -> &'a Policy {
    match caller_key {
        Some(key) if config.paid_keys.contains(key.trim()) => &config.paid_limit,
        _ => &config.free_limit,
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
