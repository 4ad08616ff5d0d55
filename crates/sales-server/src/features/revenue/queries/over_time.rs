//! Revenue over time query
//!
//! Buckets align to calendar boundaries via `DATE_TRUNC` on the stored
//! `DATE`, so a quarter always starts on Jan 1, Apr 1, Jul 1 or Oct 1.

use sqlx::PgPool;

use super::{RevenueQueryError, REVENUE_SUM};
use crate::features::revenue::types::{Interval, PeriodRevenue, RevenueBreakdown};
use crate::features::shared::DateRange;

#[derive(Debug, Clone, Copy)]
pub struct RevenueOverTimeQuery {
    pub range: DateRange,
    pub interval: Interval,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: RevenueOverTimeQuery,
) -> Result<RevenueBreakdown, RevenueQueryError> {
    // Interval only ever yields the static unit and pattern strings
    let bucket = format!("DATE_TRUNC('{}', o.sale_date)", query.interval.trunc_unit());
    let sql = format!(
        r#"
        SELECT TO_CHAR({bucket}, '{label}') AS period,
               {bucket}::date AS period_start,
               {REVENUE_SUM} AS revenue
        FROM orders o
        JOIN order_items oi ON oi.order_id = o.order_id
        WHERE o.sale_date BETWEEN $1 AND $2
        GROUP BY 1, 2
        ORDER BY 2
        "#,
        label = query.interval.label_format(),
    );

    let rows = sqlx::query_as::<_, PeriodRevenue>(&sql)
        .bind(query.range.start)
        .bind(query.range.end)
        .fetch_all(&pool)
        .await?;

    Ok(RevenueBreakdown::OverTime(rows))
}
