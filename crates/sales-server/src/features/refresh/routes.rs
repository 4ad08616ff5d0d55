//! Data refresh API routes
//!
//! - `POST /api/v1/data/refresh` - Start a detached refresh run
//! - `GET /api/v1/data/refresh-logs` - List refresh runs, newest first
//! - `GET /api/v1/data/refresh-logs/:log_id` - Get one refresh run

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::commands::{trigger, TriggerRefreshCommand, TriggerRefreshError};
use super::queries::{get_log, list_logs, GetRefreshLogError, GetRefreshLogQuery, ListRefreshLogsError};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;
use crate::ingest::refresh_log::RefreshLogQuery;

pub fn refresh_routes() -> Router<FeatureState> {
    Router::new()
        .route("/refresh", post(trigger_refresh))
        .route("/refresh-logs", get(list_refresh_logs))
        .route("/refresh-logs/:log_id", get(get_refresh_log))
}

/// Start a refresh run
///
/// # Request Body
///
/// ```json
/// { "file_path": "data/sales.csv" }
/// ```
///
/// The body, or `file_path` within it, may be omitted to load the configured
/// default source.
///
/// # Response
///
/// - `202 Accepted` - Run submitted; follow it through the refresh logs
/// - `400 Bad Request` - Malformed body or blank `file_path`
/// - `503 Service Unavailable` - Server is shutting down
#[tracing::instrument(skip(state, body))]
async fn trigger_refresh(
    State(state): State<FeatureState>,
    body: Bytes,
) -> Result<Response, RefreshApiError> {
    let command = if body.iter().all(u8::is_ascii_whitespace) {
        TriggerRefreshCommand::default()
    } else {
        serde_json::from_slice::<TriggerRefreshCommand>(&body)
            .map_err(|e| RefreshApiError::InvalidBody(e.to_string()))?
    };

    let response = trigger::handle(&state.runner, command)?;

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(response))).into_response())
}

/// List refresh runs
///
/// `GET /api/v1/data/refresh-logs?status=FAILED&triggered_by=API&limit=20&offset=0`
///
/// `start_time` / `end_time` are RFC 3339 bounds on the run start.
#[tracing::instrument(skip(state))]
async fn list_refresh_logs(
    State(state): State<FeatureState>,
    Query(query): Query<RefreshLogQuery>,
) -> Result<Response, RefreshApiError> {
    let response = list_logs::handle(state.db, query).await?;

    let meta = json!({
        "limit": response.limit,
        "offset": response.offset,
        "count": response.logs.len(),
    });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.logs, meta))).into_response())
}

/// Get one refresh run
///
/// - `200 OK` - Run found
/// - `404 Not Found` - No run with that id
#[tracing::instrument(skip(state))]
async fn get_refresh_log(
    State(state): State<FeatureState>,
    Path(log_id): Path<i64>,
) -> Result<Response, RefreshApiError> {
    let log = get_log::handle(state.db, GetRefreshLogQuery { log_id }).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(log))).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum RefreshApiError {
    InvalidBody(String),
    Trigger(TriggerRefreshError),
    Get(GetRefreshLogError),
    List(ListRefreshLogsError),
}

impl From<TriggerRefreshError> for RefreshApiError {
    fn from(err: TriggerRefreshError) -> Self {
        Self::Trigger(err)
    }
}

impl From<GetRefreshLogError> for RefreshApiError {
    fn from(err: GetRefreshLogError) -> Self {
        Self::Get(err)
    }
}

impl From<ListRefreshLogsError> for RefreshApiError {
    fn from(err: ListRefreshLogsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for RefreshApiError {
    fn into_response(self) -> Response {
        match self {
            RefreshApiError::InvalidBody(message) => {
                let error =
                    ErrorResponse::new("BAD_REQUEST", format!("Invalid request payload: {}", message));
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            RefreshApiError::Trigger(err @ TriggerRefreshError::BlankFilePath) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", err.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            RefreshApiError::Trigger(err @ TriggerRefreshError::Unavailable(_)) => {
                let error = ErrorResponse::new("SERVICE_UNAVAILABLE", err.to_string());
                (StatusCode::SERVICE_UNAVAILABLE, Json(error)).into_response()
            },
            RefreshApiError::Get(err @ GetRefreshLogError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", err.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            RefreshApiError::List(err @ ListRefreshLogsError::InvalidTimeRange) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", err.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            RefreshApiError::Get(GetRefreshLogError::Database(err))
            | RefreshApiError::List(ListRefreshLogsError::Database(err)) => {
                tracing::error!("Database error during refresh log query: {}", err);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}
