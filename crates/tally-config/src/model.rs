// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Tally configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    /// SQLite file settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Retry policy for busy/locked database conditions.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// How long SQLite itself waits on a locked database before reporting busy.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StorageConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    "bot_users.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Retry configuration for transient store errors.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per statement, the first one included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed pause between attempts, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    2000
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = TallyConfig::default();
        assert_eq!(config.storage.database_path, "bot_users.db");
        assert_eq!(config.storage.busy_timeout(), Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay(), Duration::from_secs(2));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: TallyConfig = toml::from_str("[retry]\nmax_attempts = 5\n").unwrap();
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay_ms, 2000);
        assert_eq!(config.storage.database_path, "bot_users.db");
    }

    #[test]
    fn unknown_section_is_rejected() {
        let result = toml::from_str::<TallyConfig>("[cache]\nsize = 1\n");
        assert!(result.is_err());
    }
}
