//! Rate-limit policy strings.
//!
//! A policy is `<count>/<period>` where the period is an optional
//! multiplier followed by a granularity: `30/minute`, `5/10 seconds`,
//! `1000/day`. Policies come from configuration and are parsed once at
//! startup, so a malformed string is a startup failure rather than a
//! per-request one.

use std::fmt;
use std::str::FromStr;

// =============================================================================
// GRANULARITY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
}

impl Granularity {
    fn secs(self) -> u64 {
        match self {
            Granularity::Second => 1,
            Granularity::Minute => 60,
            Granularity::Hour => 3600,
            Granularity::Day => 86_400,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Granularity::Second => "second",
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "second" | "seconds" => Some(Granularity::Second),
            "minute" | "minutes" => Some(Granularity::Minute),
            "hour" | "hours" => Some(Granularity::Hour),
            "day" | "days" => Some(Granularity::Day),
            _ => None,
        }
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// A request budget: at most `max` admissions per period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    max: u32,
    multiplier: u32,
    granularity: Granularity,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolicyParseError {
    #[error("policy must be <count>/<period>, got {0:?}")]
    Malformed(String),
    #[error("invalid request count {0:?}")]
    InvalidCount(String),
    #[error("invalid period multiplier {0:?}")]
    InvalidMultiplier(String),
    #[error("unknown period granularity {0:?}")]
    UnknownGranularity(String),
}

impl FromStr for Policy {
    type Err = PolicyParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let Some((count, period)) = raw.split_once('/') else {
            return Err(PolicyParseError::Malformed(raw.to_string()));
        };

        let count = count.trim();
        let max = count
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| PolicyParseError::InvalidCount(count.to_string()))?;

        let period = period.trim();
        let (multiplier, granularity) = match period.split_once(' ') {
            Some((m, g)) => {
                let m = m.trim();
                let multiplier = m
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| PolicyParseError::InvalidMultiplier(m.to_string()))?;
                (multiplier, g.trim())
            }
            None => (1, period),
        };

        let granularity =
            Granularity::parse(granularity).ok_or_else(|| PolicyParseError::UnknownGranularity(granularity.to_string()))?;

        Ok(Self { max, multiplier, granularity })
    }
}

impl Policy {
    /// Maximum admissions per window.
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[must_use]
    pub fn period_secs(&self) -> u64 {
        u64::from(self.multiplier) * self.granularity.secs()
    }

    /// Header-facing period label, e.g. `minute` or `10 seconds`.
    #[must_use]
    pub fn period_label(&self) -> String {
        if self.multiplier == 1 {
            self.granularity.label().to_string()
        } else {
            format!("{} {}s", self.multiplier, self.granularity.label())
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.max, self.period_label())
    }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
