//! Ingestion configuration
//!
//! Settings for refresh runs, the cron trigger and the detached runner
//! (REFRESH_* and INGEST_* environment variables).

use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr, time::Duration};
use tracing::warn;

/// Default number of records read per batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default source file for scheduled runs and API requests without a path.
pub const DEFAULT_SOURCE_PATH: &str = "./sample.csv";

/// Default refresh schedule: daily at midnight (cron with seconds field).
pub const DEFAULT_REFRESH_SCHEDULE: &str = "0 0 0 * * *";

/// Default wall-clock cap for one run (1 hour).
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 3600;

/// Default time the runner waits for in-flight runs at shutdown.
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

/// Main ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Records per batch; bounds buffering and sets progress granularity
    pub batch_size: usize,
    /// Source used by the scheduler and by API requests that omit a path
    pub default_source_path: PathBuf,
    /// Cron expression with a leading seconds field
    pub schedule: String,
    /// Whether the cron trigger is registered at startup
    pub schedule_enabled: bool,
    /// Wall-clock cap for one run; 0 disables the cap
    pub run_timeout_secs: u64,
    /// Serialize runs with a transaction-scoped advisory lock
    pub serialize_runs: bool,
    /// How long shutdown waits for in-flight runs
    pub shutdown_grace_secs: u64,
}

impl IngestConfig {
    /// Load ingestion configuration from environment variables
    ///
    /// Unset variables take their defaults. Values that do not parse also
    /// fall back to the default, with a warning.
    pub fn from_env() -> Self {
        Self {
            batch_size: env_or("REFRESH_BATCH_SIZE", DEFAULT_BATCH_SIZE),
            default_source_path: std::env::var("DEFAULT_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOURCE_PATH)),
            schedule: std::env::var("REFRESH_SCHEDULE")
                .unwrap_or_else(|_| DEFAULT_REFRESH_SCHEDULE.to_string()),
            schedule_enabled: env_or("REFRESH_SCHEDULE_ENABLED", true),
            run_timeout_secs: env_or("REFRESH_TIMEOUT_SECS", DEFAULT_RUN_TIMEOUT_SECS),
            serialize_runs: env_or("INGEST_SERIALIZE_RUNS", false),
            shutdown_grace_secs: env_or("REFRESH_SHUTDOWN_GRACE_SECS", DEFAULT_SHUTDOWN_GRACE_SECS),
        }
    }

    /// Validate ingestion configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("Refresh batch size must be greater than 0");
        }

        if self.schedule_enabled && self.schedule.trim().is_empty() {
            anyhow::bail!("Refresh schedule cannot be empty while scheduling is enabled");
        }

        if self.default_source_path.as_os_str().is_empty() {
            anyhow::bail!("Default source path cannot be empty");
        }

        Ok(())
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        (self.run_timeout_secs > 0).then(|| Duration::from_secs(self.run_timeout_secs))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Read `key`, falling back to `default` when unset or unparsable
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = raw, %default, "Ignoring unparsable setting; using default");
            default
        },
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            default_source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            schedule: DEFAULT_REFRESH_SCHEDULE.to_string(),
            schedule_enabled: true,
            run_timeout_secs: DEFAULT_RUN_TIMEOUT_SECS,
            serialize_runs: false,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.default_source_path, PathBuf::from("./sample.csv"));
        assert_eq!(config.run_timeout(), Some(Duration::from_secs(3600)));
        assert!(!config.serialize_runs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_disables_cap() {
        let config = IngestConfig {
            run_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.run_timeout(), None);
    }

    #[test]
    fn test_unparsable_value_falls_back_to_default() {
        assert_eq!(parse_or("REFRESH_BATCH_SIZE", "abc", DEFAULT_BATCH_SIZE), 1000);
        assert_eq!(parse_or("REFRESH_BATCH_SIZE", " 250 ", DEFAULT_BATCH_SIZE), 250);
        assert!(!parse_or("INGEST_SERIALIZE_RUNS", "yes", false));
        assert!(parse_or("INGEST_SERIALIZE_RUNS", "true", false));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = IngestConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_schedule_only_rejected_when_enabled() {
        let mut config = IngestConfig {
            schedule: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.schedule_enabled = false;
        assert!(config.validate().is_ok());
    }
}
