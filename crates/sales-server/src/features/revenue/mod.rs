//! Revenue feature module
//!
//! Read-only revenue aggregations over the ingested sales tables.

pub mod queries;
pub mod routes;
pub mod types;

pub use routes::revenue_routes;
pub use types::{
    CategoryRevenue, Interval, PeriodRevenue, ProductRevenue, RegionRevenue, RevenueBreakdown,
    TotalRevenue,
};
