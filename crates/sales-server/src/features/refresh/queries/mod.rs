//! Refresh log queries

pub mod get_log;
pub mod list_logs;

pub use get_log::{GetRefreshLogError, GetRefreshLogQuery};
pub use list_logs::{ListRefreshLogsError, ListRefreshLogsResponse};
