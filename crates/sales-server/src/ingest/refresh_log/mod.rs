//! Refresh audit log
//!
//! One row per refresh run in `data_refresh_logs`. Rows are written through
//! the pool, never through the run's transaction, so a FAILED record
//! survives the rollback of the data it describes.

pub mod models;
pub mod queries;

pub use models::{
    RefreshLog, RefreshLogQuery, RefreshStatus, UnknownStatus, DEFAULT_REFRESH_LOG_LIMIT,
    MAX_REFRESH_LOG_LIMIT, TRIGGER_API, TRIGGER_SCHEDULER,
};
pub use queries::{complete_refresh, get_refresh_log, query_refresh_logs, start_refresh};
