//! Revenue by product query

use sqlx::PgPool;

use super::{RevenueQueryError, REVENUE_SUM};
use crate::features::revenue::types::{ProductRevenue, RevenueBreakdown};
use crate::features::shared::DateRange;

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, range: DateRange) -> Result<RevenueBreakdown, RevenueQueryError> {
    let sql = format!(
        r#"
        SELECT p.product_id, p.name, {REVENUE_SUM} AS revenue
        FROM products p
        JOIN order_items oi ON oi.product_id = p.product_id
        JOIN orders o ON o.order_id = oi.order_id
        WHERE o.sale_date BETWEEN $1 AND $2
        GROUP BY p.product_id, p.name
        ORDER BY revenue DESC, p.product_id
        "#
    );

    let rows = sqlx::query_as::<_, ProductRevenue>(&sql)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&pool)
        .await?;

    Ok(RevenueBreakdown::ByProduct(rows))
}
