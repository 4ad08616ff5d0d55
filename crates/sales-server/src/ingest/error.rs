//! Error taxonomy for refresh runs
//!
//! Every error raised while a run is active is fatal to that run. The
//! pipeline stops at the first one, rolls back, and records the rendered
//! message in `data_refresh_logs.error_message`.

use std::{fmt, path::PathBuf, time::Duration};
use thiserror::Error;

/// Why a required column could not be read from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCause {
    /// The header row does not name the column
    NotInHeader,
    /// The header names the column but this record is too short to reach it
    RecordTooShort { position: usize, len: usize },
}

impl fmt::Display for MissingCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInHeader => write!(f, "not present in header"),
            Self::RecordTooShort { position, len } => write!(
                f,
                "record has {} fields but the column is at position {}",
                len, position
            ),
        }
    }
}

/// Failure turning one raw record into a [`SalesRecord`](super::models::SalesRecord)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing column '{column}': {cause}")]
    MissingColumn {
        column: &'static str,
        cause: MissingCause,
    },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidFormat {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn invalid(
        field: &'static str,
        value: &str,
        reason: impl fmt::Display,
    ) -> Self {
        Self::InvalidFormat {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A store write that failed, tagged with the operation that issued it
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct StoreError {
    pub operation: &'static str,
    #[source]
    pub source: sqlx::Error,
}

impl StoreError {
    pub(crate) fn new(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self { operation, source }
    }
}

/// Errors that end a refresh run
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to write refresh log: {0}")]
    RefreshLog(#[source] sqlx::Error),

    #[error("failed to open source file '{}': {source}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source file is empty")]
    EmptySource,

    #[error("failed to read header row: {0}")]
    Header(#[source] csv_async::Error),

    #[error("failed to read record at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv_async::Error,
    },

    #[error("error processing record {row}: {source}")]
    Record {
        row: u64,
        #[source]
        source: ParseError,
    },

    #[error("error processing record {row}: {source}")]
    Store {
        row: u64,
        #[source]
        source: StoreError,
    },

    #[error("transaction {operation} failed: {source}")]
    Transaction {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("refresh timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("refresh cancelled by shutdown")]
    Cancelled,
}

impl IngestError {
    pub(crate) fn transaction(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Transaction { operation, source }
    }
}

/// A refresh run that ended in failure
///
/// `log_id` is unset only when the log row itself could not be created.
#[derive(Debug, Error)]
#[error("refresh failed after {rows_processed} rows: {error}")]
pub struct RefreshFailure {
    pub log_id: Option<i64>,
    pub rows_processed: u64,
    #[source]
    pub error: IngestError,
}
