//! Get refresh log query

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::ingest::refresh_log::{get_refresh_log, RefreshLog};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRefreshLogQuery {
    pub log_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetRefreshLogError {
    #[error("Refresh log {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetRefreshLogQuery) -> Result<RefreshLog, GetRefreshLogError> {
    get_refresh_log(&pool, query.log_id)
        .await?
        .ok_or(GetRefreshLogError::NotFound(query.log_id))
}
