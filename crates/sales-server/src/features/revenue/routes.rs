//! Revenue API routes
//!
//! - `GET /api/v1/revenue/total` - Total revenue in a date range
//! - `GET /api/v1/revenue/by-product` - Revenue per product
//! - `GET /api/v1/revenue/by-category` - Revenue per product category
//! - `GET /api/v1/revenue/by-region` - Revenue per region
//! - `GET /api/v1/revenue/over-time` - Revenue per calendar bucket
//!
//! Every route accepts optional `start_date` and `end_date` (`YYYY-MM-DD`).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sales_common::SalesError;
use serde::Deserialize;
use sqlx::PgPool;

use super::queries::{self, RevenueOverTimeQuery, RevenueQueryError};
use super::types::{InvalidInterval, Interval};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::DateRangeParams;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn revenue_routes() -> Router<PgPool> {
    Router::new()
        .route("/total", get(total_revenue))
        .route("/by-product", get(revenue_by_product))
        .route("/by-category", get(revenue_by_category))
        .route("/by-region", get(revenue_by_region))
        .route("/over-time", get(revenue_over_time))
}

// ============================================================================
// Query Handlers
// ============================================================================

/// Total revenue
///
/// `GET /api/v1/revenue/total?start_date=2024-01-01&end_date=2024-12-31`
#[tracing::instrument(skip(pool))]
async fn total_revenue(
    State(pool): State<PgPool>,
    Query(params): Query<DateRangeParams>,
) -> Result<Response, RevenueApiError> {
    let range = params.resolve()?;
    let total = queries::total::handle(pool, range).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(total, range.to_meta())))
        .into_response())
}

/// Revenue per product, highest first
///
/// `GET /api/v1/revenue/by-product`
#[tracing::instrument(skip(pool))]
async fn revenue_by_product(
    State(pool): State<PgPool>,
    Query(params): Query<DateRangeParams>,
) -> Result<Response, RevenueApiError> {
    let range = params.resolve()?;
    let breakdown = queries::by_product::handle(pool, range).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(breakdown, range.to_meta())))
        .into_response())
}

/// Revenue per category, highest first
///
/// `GET /api/v1/revenue/by-category`
#[tracing::instrument(skip(pool))]
async fn revenue_by_category(
    State(pool): State<PgPool>,
    Query(params): Query<DateRangeParams>,
) -> Result<Response, RevenueApiError> {
    let range = params.resolve()?;
    let breakdown = queries::by_category::handle(pool, range).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(breakdown, range.to_meta())))
        .into_response())
}

/// Revenue per region, highest first
///
/// `GET /api/v1/revenue/by-region`
#[tracing::instrument(skip(pool))]
async fn revenue_by_region(
    State(pool): State<PgPool>,
    Query(params): Query<DateRangeParams>,
) -> Result<Response, RevenueApiError> {
    let range = params.resolve()?;
    let breakdown = queries::by_region::handle(pool, range).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(breakdown, range.to_meta())))
        .into_response())
}

#[derive(Debug, Deserialize)]
struct OverTimeParams {
    #[serde(flatten)]
    range: DateRangeParams,
    interval: Option<String>,
}

/// Revenue per calendar bucket, oldest first
///
/// `GET /api/v1/revenue/over-time?interval=quarterly`
///
/// `interval` is `monthly` (default), `quarterly` or `yearly`.
#[tracing::instrument(skip(pool))]
async fn revenue_over_time(
    State(pool): State<PgPool>,
    Query(params): Query<OverTimeParams>,
) -> Result<Response, RevenueApiError> {
    let range = params.range.resolve()?;
    let interval = match params.interval.as_deref() {
        None | Some("") => Interval::default(),
        Some(value) => value.parse::<Interval>()?,
    };

    let breakdown =
        queries::over_time::handle(pool, RevenueOverTimeQuery { range, interval }).await?;

    let mut meta = range.to_meta();
    meta["interval"] = serde_json::Value::from(interval.as_str());

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(breakdown, meta))).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum RevenueApiError {
    InvalidRange(SalesError),
    InvalidInterval(InvalidInterval),
    Query(RevenueQueryError),
}

impl From<SalesError> for RevenueApiError {
    fn from(err: SalesError) -> Self {
        Self::InvalidRange(err)
    }
}

impl From<InvalidInterval> for RevenueApiError {
    fn from(err: InvalidInterval) -> Self {
        Self::InvalidInterval(err)
    }
}

impl From<RevenueQueryError> for RevenueApiError {
    fn from(err: RevenueQueryError) -> Self {
        Self::Query(err)
    }
}

impl IntoResponse for RevenueApiError {
    fn into_response(self) -> Response {
        match self {
            RevenueApiError::InvalidRange(err) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", err.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            RevenueApiError::InvalidInterval(err) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", err.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            RevenueApiError::Query(err) => {
                tracing::error!("Database error during revenue query: {}", err);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/unused")
            .unwrap();
        revenue_routes().with_state(pool)
    }

    async fn error_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_date_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/total?start_date=2024-1-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_inverted_range_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/by-region?start_date=2024-05-01&end_date=2024-04-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_interval_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/over-time?interval=weekly")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("weekly"));
    }
}
