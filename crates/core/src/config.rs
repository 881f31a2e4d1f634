// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator configuration
//!
//! Loaded from TOML; durations use humantime notation:
//!
//! ```toml
//! [backoff]
//! base = "50ms"
//! increment = "50ms"
//! ceiling = "1s"
//! max_attempts = 100
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Linear backoff schedule used while waiting for a lock
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Sleep after the first failed attempt
    #[serde(with = "humantime_serde")]
    pub base: Duration,
    /// Added to the sleep after every further attempt
    #[serde(with = "humantime_serde")]
    pub increment: Duration,
    /// Upper bound on a single sleep
    #[serde(with = "humantime_serde")]
    pub ceiling: Duration,
    /// Total number of lookups before giving up
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(50),
            increment: Duration::from_millis(50),
            ceiling: Duration::from_secs(1),
            max_attempts: 100,
        }
    }
}

impl BackoffConfig {
    pub fn new(base: Duration, increment: Duration, ceiling: Duration) -> Self {
        Self {
            base,
            increment,
            ceiling,
            ..Self::default()
        }
    }

    /// A schedule that never sleeps, for tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            base: Duration::ZERO,
            increment: Duration::ZERO,
            ceiling: Duration::ZERO,
            max_attempts,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sleep following failed attempt number `attempt` (zero-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base
            .saturating_add(self.increment.saturating_mul(attempt))
            .min(self.ceiling)
    }

    /// Every sleep a fully exhausted wait performs, in order
    ///
    /// There is one sleep between each pair of attempts, none after the last.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts.saturating_sub(1)).map(|attempt| self.delay_for(attempt))
    }

    /// Longest time a wait can spend sleeping before it times out
    pub fn max_wait(&self) -> Duration {
        self.schedule().fold(Duration::ZERO, Duration::saturating_add)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "backoff.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.ceiling < self.base {
            return Err(ConfigError::Invalid(format!(
                "backoff.ceiling ({}) is below backoff.base ({})",
                humantime::format_duration(self.ceiling),
                humantime::format_duration(self.base)
            )));
        }
        Ok(())
    }
}

impl fmt::Display for BackoffConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempts, {} + {} per attempt, capped at {}",
            self.max_attempts,
            humantime::format_duration(self.base),
            humantime::format_duration(self.increment),
            humantime::format_duration(self.ceiling)
        )
    }
}

/// Top-level coordinator configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub backoff: BackoffConfig,
}

impl CoordinatorConfig {
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backoff.validate()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
