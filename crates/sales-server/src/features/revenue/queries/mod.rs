//! Revenue queries
//!
//! Line revenue is `unit_price * quantity * (1 - discount)`, counted when the
//! parent order's sale_date falls inside the inclusive range. Sums are
//! computed as NUMERIC and cast to float8 for the response.

pub mod by_category;
pub mod by_product;
pub mod by_region;
pub mod over_time;
pub mod total;

pub use over_time::RevenueOverTimeQuery;

/// Summed line revenue as float8
pub(crate) const REVENUE_SUM: &str =
    "COALESCE(SUM(oi.unit_price * oi.quantity * (1 - oi.discount)), 0)::float8";

/// Error type for revenue queries
#[derive(Debug, thiserror::Error)]
pub enum RevenueQueryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
