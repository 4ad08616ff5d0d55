//! List refresh logs query

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::ingest::refresh_log::{
    query_refresh_logs, RefreshLog, RefreshLogQuery, MAX_REFRESH_LOG_LIMIT,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRefreshLogsResponse {
    pub logs: Vec<RefreshLog>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ListRefreshLogsError {
    #[error("Start time must not be after end time")]
    InvalidTimeRange,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: RefreshLogQuery,
) -> Result<ListRefreshLogsResponse, ListRefreshLogsError> {
    if let (Some(start), Some(end)) = (query.start_time, query.end_time) {
        if start > end {
            return Err(ListRefreshLogsError::InvalidTimeRange);
        }
    }

    let limit = query.limit.clamp(1, MAX_REFRESH_LOG_LIMIT);
    let offset = query.offset.max(0);
    let logs = query_refresh_logs(&pool, query).await?;

    Ok(ListRefreshLogsResponse {
        logs,
        limit,
        offset,
    })
}
