//! Refresh log query tests
//!
//! Rows are inserted directly so start times are deterministic.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sales_server::features::refresh::queries::{list_logs, ListRefreshLogsError};
use sales_server::ingest::refresh_log::{
    complete_refresh, get_refresh_log, query_refresh_logs, start_refresh, RefreshLogQuery,
    RefreshStatus, TRIGGER_API, TRIGGER_SCHEDULER,
};
use sales_server::ingest::IngestError;
use sqlx::PgPool;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

async fn insert_log(
    pool: &PgPool,
    offset_hours: i64,
    status: RefreshStatus,
    triggered_by: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
        INSERT INTO data_refresh_logs (start_time, status, rows_processed, triggered_by)
        VALUES ($1, $2, 0, $3)
        RETURNING log_id
        "#,
    )
    .bind(base_time() + Duration::hours(offset_hours))
    .bind(status.as_str())
    .bind(triggered_by)
    .fetch_one(pool)
    .await
}

/// Five runs, one hour apart: API completed, SCHEDULER failed, API failed,
/// SCHEDULER completed, API started
async fn seed(pool: &PgPool) -> sqlx::Result<Vec<i64>> {
    Ok(vec![
        insert_log(pool, 0, RefreshStatus::Completed, TRIGGER_API).await?,
        insert_log(pool, 1, RefreshStatus::Failed, TRIGGER_SCHEDULER).await?,
        insert_log(pool, 2, RefreshStatus::Failed, TRIGGER_API).await?,
        insert_log(pool, 3, RefreshStatus::Completed, TRIGGER_SCHEDULER).await?,
        insert_log(pool, 4, RefreshStatus::Started, TRIGGER_API).await?,
    ])
}

fn ids(logs: &[sales_server::ingest::refresh_log::RefreshLog]) -> Vec<i64> {
    logs.iter().map(|l| l.log_id).collect()
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_start_and_complete_lifecycle(pool: PgPool) -> sqlx::Result<()> {
    let log_id = start_refresh(&pool, TRIGGER_API).await.expect("start");

    let started = get_refresh_log(&pool, log_id).await?.expect("row exists");
    assert_eq!(started.status(), Some(RefreshStatus::Started));
    assert!(started.end_time.is_none());
    assert_eq!(started.rows_processed, 0);

    complete_refresh(&pool, log_id, 42, Some(&IngestError::EmptySource))
        .await
        .expect("complete");

    let failed = get_refresh_log(&pool, log_id).await?.expect("row exists");
    assert_eq!(failed.status(), Some(RefreshStatus::Failed));
    assert_eq!(failed.rows_processed, 42);
    assert_eq!(
        failed.error_message.as_deref(),
        Some(IngestError::EmptySource.to_string().as_str())
    );
    assert!(failed.end_time.is_some());

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_missing_log_is_none(pool: PgPool) -> sqlx::Result<()> {
    assert!(get_refresh_log(&pool, 9999).await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_logs_are_newest_first(pool: PgPool) -> sqlx::Result<()> {
    let seeded = seed(&pool).await?;

    let logs = query_refresh_logs(&pool, RefreshLogQuery::default()).await?;

    let mut expected = seeded.clone();
    expected.reverse();
    assert_eq!(ids(&logs), expected);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_filter_by_status_and_trigger(pool: PgPool) -> sqlx::Result<()> {
    let seeded = seed(&pool).await?;

    let failed = query_refresh_logs(
        &pool,
        RefreshLogQuery {
            status: Some(RefreshStatus::Failed),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(ids(&failed), vec![seeded[2], seeded[1]]);

    let api_completed = query_refresh_logs(
        &pool,
        RefreshLogQuery {
            status: Some(RefreshStatus::Completed),
            triggered_by: Some(TRIGGER_API.to_string()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(ids(&api_completed), vec![seeded[0]]);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_filter_by_time_window_is_inclusive(pool: PgPool) -> sqlx::Result<()> {
    let seeded = seed(&pool).await?;

    let logs = query_refresh_logs(
        &pool,
        RefreshLogQuery {
            start_time: Some(base_time() + Duration::hours(1)),
            end_time: Some(base_time() + Duration::hours(3)),
            ..Default::default()
        },
    )
    .await?;

    assert_eq!(ids(&logs), vec![seeded[3], seeded[2], seeded[1]]);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_limit_and_offset(pool: PgPool) -> sqlx::Result<()> {
    let seeded = seed(&pool).await?;

    let page = query_refresh_logs(
        &pool,
        RefreshLogQuery {
            limit: 2,
            offset: 1,
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(ids(&page), vec![seeded[3], seeded[2]]);

    // Non-positive limits are clamped to one row
    let clamped = query_refresh_logs(
        &pool,
        RefreshLogQuery {
            limit: 0,
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(clamped.len(), 1);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_handler_rejects_inverted_window(pool: PgPool) -> sqlx::Result<()> {
    let result = list_logs::handle(
        pool,
        RefreshLogQuery {
            start_time: Some(base_time() + Duration::hours(2)),
            end_time: Some(base_time()),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(result, Err(ListRefreshLogsError::InvalidTimeRange)));

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_handler_reports_effective_paging(pool: PgPool) -> sqlx::Result<()> {
    seed(&pool).await?;

    let response = list_logs::handle(
        pool,
        RefreshLogQuery {
            limit: 10_000,
            offset: -5,
            ..Default::default()
        },
    )
    .await
    .expect("list");

    assert_eq!(response.limit, 500);
    assert_eq!(response.offset, 0);
    assert_eq!(response.logs.len(), 5);

    Ok(())
}
