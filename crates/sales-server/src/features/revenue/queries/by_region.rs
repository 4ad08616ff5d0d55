//! Revenue by region query

use sqlx::PgPool;

use super::{RevenueQueryError, REVENUE_SUM};
use crate::features::revenue::types::{RegionRevenue, RevenueBreakdown};
use crate::features::shared::DateRange;

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, range: DateRange) -> Result<RevenueBreakdown, RevenueQueryError> {
    let sql = format!(
        r#"
        SELECT r.name AS region, {REVENUE_SUM} AS revenue
        FROM regions r
        JOIN orders o ON o.region_id = r.region_id
        JOIN order_items oi ON oi.order_id = o.order_id
        WHERE o.sale_date BETWEEN $1 AND $2
        GROUP BY r.name
        ORDER BY revenue DESC, r.name
        "#
    );

    let rows = sqlx::query_as::<_, RegionRevenue>(&sql)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&pool)
        .await?;

    Ok(RevenueBreakdown::ByRegion(rows))
}
