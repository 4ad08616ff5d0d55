//! Database queries for refresh logs

use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use super::models::{RefreshLog, RefreshLogQuery, RefreshStatus, MAX_REFRESH_LOG_LIMIT};
use crate::ingest::error::IngestError;

/// Record the start of a run and return its log id
///
/// Nothing has been read or written yet when this fails, so the caller can
/// abort the run without further bookkeeping.
pub async fn start_refresh(pool: &PgPool, triggered_by: &str) -> Result<i64, IngestError> {
    let log_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO data_refresh_logs (start_time, status, rows_processed, triggered_by)
        VALUES ($1, $2, 0, $3)
        RETURNING log_id
        "#,
    )
    .bind(Utc::now())
    .bind(RefreshStatus::Started.as_str())
    .bind(triggered_by)
    .fetch_one(pool)
    .await
    .map_err(IngestError::RefreshLog)?;

    debug!(log_id, triggered_by, "Created refresh log entry");

    Ok(log_id)
}

/// Close a run's log row exactly once
///
/// `error` set means FAILED with its message, otherwise COMPLETED.
pub async fn complete_refresh(
    pool: &PgPool,
    log_id: i64,
    rows_processed: u64,
    error: Option<&IngestError>,
) -> Result<(), IngestError> {
    let status = if error.is_some() {
        RefreshStatus::Failed
    } else {
        RefreshStatus::Completed
    };

    sqlx::query(
        r#"
        UPDATE data_refresh_logs
        SET end_time = $1, status = $2, rows_processed = $3, error_message = $4
        WHERE log_id = $5
        "#,
    )
    .bind(Utc::now())
    .bind(status.as_str())
    .bind(i64::try_from(rows_processed).unwrap_or(i64::MAX))
    .bind(error.map(ToString::to_string))
    .bind(log_id)
    .execute(pool)
    .await
    .map_err(IngestError::RefreshLog)?;

    debug!(log_id, %status, rows_processed, "Closed refresh log entry");

    Ok(())
}

/// Fetch one refresh log by id
pub async fn get_refresh_log(pool: &PgPool, log_id: i64) -> Result<Option<RefreshLog>, sqlx::Error> {
    sqlx::query_as::<_, RefreshLog>(
        r#"
        SELECT log_id, start_time, end_time, status, rows_processed, error_message, triggered_by
        FROM data_refresh_logs
        WHERE log_id = $1
        "#,
    )
    .bind(log_id)
    .fetch_optional(pool)
    .await
}

/// Query refresh logs with filters, newest first
pub async fn query_refresh_logs(
    pool: &PgPool,
    query: RefreshLogQuery,
) -> Result<Vec<RefreshLog>, sqlx::Error> {
    let limit = query.limit.clamp(1, MAX_REFRESH_LOG_LIMIT);
    let offset = query.offset.max(0);

    let mut sql = String::from(
        r#"
        SELECT log_id, start_time, end_time, status, rows_processed, error_message, triggered_by
        FROM data_refresh_logs
        WHERE 1=1
        "#,
    );

    let mut bind_count = 1;
    let mut conditions = Vec::new();

    if query.status.is_some() {
        conditions.push(format!("status = ${}", bind_count));
        bind_count += 1;
    }
    if query.triggered_by.is_some() {
        conditions.push(format!("triggered_by = ${}", bind_count));
        bind_count += 1;
    }
    if query.start_time.is_some() {
        conditions.push(format!("start_time >= ${}", bind_count));
        bind_count += 1;
    }
    if query.end_time.is_some() {
        conditions.push(format!("start_time <= ${}", bind_count));
        bind_count += 1;
    }

    for condition in conditions {
        sql.push_str(" AND ");
        sql.push_str(&condition);
    }

    sql.push_str(" ORDER BY start_time DESC, log_id DESC");
    sql.push_str(&format!(" LIMIT ${}", bind_count));
    bind_count += 1;
    sql.push_str(&format!(" OFFSET ${}", bind_count));

    let mut query_builder = sqlx::query_as::<_, RefreshLog>(&sql);

    if let Some(status) = query.status {
        query_builder = query_builder.bind(status.as_str());
    }
    if let Some(triggered_by) = query.triggered_by {
        query_builder = query_builder.bind(triggered_by);
    }
    if let Some(start_time) = query.start_time {
        query_builder = query_builder.bind(start_time);
    }
    if let Some(end_time) = query.end_time {
        query_builder = query_builder.bind(end_time);
    }

    query_builder = query_builder.bind(limit).bind(offset);

    let records = query_builder.fetch_all(pool).await?;

    debug!(count = records.len(), "Queried refresh logs");

    Ok(records)
}
