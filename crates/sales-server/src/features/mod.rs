//! Feature modules implementing the sales analytics API
//!
//! Each feature is a vertical slice with its own queries, commands and
//! routes, mounted under `/api/v1`.
//!
//! # Features
//!
//! - **revenue**: revenue totals and breakdowns over a date range
//! - **refresh**: on-demand data refresh and the refresh audit log
//!
//! # Architecture
//!
//! - `commands/` - Write operations
//! - `queries/` - Read operations, one `handle` function per query
//! - `routes.rs` - HTTP route definitions and error mapping
//! - `types.rs` - Shared result types (if needed)

pub mod refresh;
pub mod revenue;
pub mod shared;

use axum::Router;

use crate::ingest::RefreshRunner;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool for read queries
    pub db: sqlx::PgPool,
    /// Detached refresh runs submitted over HTTP
    pub runner: RefreshRunner,
}

/// Creates the API router with all feature routes mounted
///
/// - `/revenue` - Revenue aggregations
/// - `/data` - Refresh trigger and refresh logs
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/revenue", revenue::revenue_routes().with_state(state.db.clone()))
        .nest("/data", refresh::refresh_routes().with_state(state))
}
