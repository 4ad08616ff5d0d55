//! Order header and line item writes

use sqlx::{Postgres, Transaction};

use super::error::StoreError;
use super::models::{ResolvedRefs, SalesRecord};

/// What happened to the order header for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOutcome {
    Inserted,
    Existing,
}

/// Write the order header if it is new, then append the line item
///
/// The existence check and the insert are not atomic against another run.
/// The header insert also skips on conflict, so a lost race keeps the
/// first header written instead of failing the run.
pub async fn upsert_order(
    tx: &mut Transaction<'_, Postgres>,
    record: &SalesRecord,
    refs: ResolvedRefs,
) -> Result<HeaderOutcome, StoreError> {
    let exists = order_exists(tx, &record.order_id).await?;

    let outcome = if exists {
        HeaderOutcome::Existing
    } else {
        insert_order_header(tx, record, refs).await?;
        HeaderOutcome::Inserted
    };

    insert_order_item(tx, record).await?;

    Ok(outcome)
}

async fn order_exists(
    tx: &mut Transaction<'_, Postgres>,
    order_id: &str,
) -> Result<bool, StoreError> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM orders WHERE order_id = $1)")
        .bind(order_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(StoreError::new("check order"))
}

async fn insert_order_header(
    tx: &mut Transaction<'_, Postgres>,
    record: &SalesRecord,
    refs: ResolvedRefs,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO orders (
            order_id, customer_id, region_id, sale_date, shipping_cost, payment_method_id
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (order_id) DO NOTHING
        "#,
    )
    .bind(&record.order_id)
    .bind(&record.customer_id)
    .bind(refs.region_id)
    .bind(record.sale_date)
    .bind(&record.shipping_cost)
    .bind(refs.payment_method_id)
    .execute(&mut **tx)
    .await
    .map_err(StoreError::new("insert order"))?;

    Ok(())
}

async fn insert_order_item(
    tx: &mut Transaction<'_, Postgres>,
    record: &SalesRecord,
) -> Result<(), StoreError> {
    // order_item_id is always fresh, so re-ingesting a file appends duplicates
    sqlx::query(
        r#"
        INSERT INTO order_items (order_id, product_id, quantity, unit_price, discount)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(&record.order_id)
    .bind(&record.product_id)
    .bind(record.quantity)
    .bind(&record.unit_price)
    .bind(&record.discount)
    .execute(&mut **tx)
    .await
    .map_err(StoreError::new("insert order item"))?;

    Ok(())
}
