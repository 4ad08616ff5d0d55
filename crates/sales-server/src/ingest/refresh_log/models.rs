//! Refresh log data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Refresh Log Constants
// ============================================================================

/// Default number of refresh logs returned per query
pub const DEFAULT_REFRESH_LOG_LIMIT: i64 = 50;

/// Maximum number of refresh logs that can be returned in a single query
pub const MAX_REFRESH_LOG_LIMIT: i64 = 500;

/// Trigger tag for runs requested over HTTP
pub const TRIGGER_API: &str = "API";

/// Trigger tag for runs started by the cron schedule
pub const TRIGGER_SCHEDULER: &str = "SCHEDULER";

/// Refresh log row from the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshLog {
    pub log_id: i64,
    pub start_time: DateTime<Utc>,
    /// Unset while the run is in flight
    pub end_time: Option<DateTime<Utc>>,
    pub status: String,
    /// Rows processed before the run ended, including on failure
    pub rows_processed: i64,
    pub error_message: Option<String>,
    /// Free-form tag naming what started the run
    pub triggered_by: String,
}

impl RefreshLog {
    pub fn status(&self) -> Option<RefreshStatus> {
        self.status.parse().ok()
    }
}

/// Lifecycle state of a refresh run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshStatus {
    Started,
    Completed,
    Failed,
}

impl RefreshStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "STARTED",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for RefreshStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown refresh status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for RefreshStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STARTED" => Ok(Self::Started),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Filters for listing refresh logs, newest first
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshLogQuery {
    pub status: Option<RefreshStatus>,
    pub triggered_by: Option<String>,
    /// Inclusive lower bound on start_time
    pub start_time: Option<DateTime<Utc>>,
    /// Inclusive upper bound on start_time
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_REFRESH_LOG_LIMIT
}

impl Default for RefreshLogQuery {
    fn default() -> Self {
        Self {
            status: None,
            triggered_by: None,
            start_time: None,
            end_time: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [RefreshStatus::Started, RefreshStatus::Completed, RefreshStatus::Failed] {
            assert_eq!(status.as_str().parse::<RefreshStatus>(), Ok(status));
        }
        assert_eq!(
            "DONE".parse::<RefreshStatus>(),
            Err(UnknownStatus("DONE".to_string()))
        );
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&RefreshStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
    }

    #[test]
    fn test_query_defaults() {
        let query: RefreshLogQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, DEFAULT_REFRESH_LOG_LIMIT);
        assert_eq!(query.offset, 0);
        assert!(query.status.is_none());

        let query: RefreshLogQuery =
            serde_json::from_str(r#"{"status":"FAILED","triggered_by":"API"}"#).unwrap();
        assert_eq!(query.status, Some(RefreshStatus::Failed));
        assert_eq!(query.triggered_by.as_deref(), Some(TRIGGER_API));
    }
}
