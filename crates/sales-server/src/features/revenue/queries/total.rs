//! Total revenue query

use sqlx::PgPool;

use super::{RevenueQueryError, REVENUE_SUM};
use crate::features::revenue::types::TotalRevenue;
use crate::features::shared::DateRange;

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, range: DateRange) -> Result<TotalRevenue, RevenueQueryError> {
    let sql = format!(
        r#"
        SELECT {REVENUE_SUM}
        FROM order_items oi
        JOIN orders o ON o.order_id = oi.order_id
        WHERE o.sale_date BETWEEN $1 AND $2
        "#
    );

    let total_revenue = sqlx::query_scalar::<_, f64>(&sql)
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&pool)
        .await?;

    Ok(TotalRevenue { total_revenue })
}
