//! Reference entity resolution
//!
//! Creates or refreshes the rows a sales record points at. All writes go
//! through the caller's transaction and nothing here commits.

use sqlx::{Postgres, Transaction};

use super::error::StoreError;
use super::models::{ResolvedRefs, SalesRecord};

/// Resolve every reference row for `record` and return the surrogate ids
///
/// Customer and product are written before the ids are returned so the
/// order and line item inserts that follow always find their parents.
pub async fn resolve_references(
    tx: &mut Transaction<'_, Postgres>,
    record: &SalesRecord,
) -> Result<ResolvedRefs, StoreError> {
    let region_id = upsert_region(tx, &record.region).await?;
    let payment_method_id = upsert_payment_method(tx, &record.payment_method).await?;
    upsert_customer(tx, record).await?;
    upsert_product(tx, record).await?;

    Ok(ResolvedRefs {
        region_id,
        payment_method_id,
    })
}

/// Insert-or-get a region by name in one round trip
///
/// The no-op update makes `RETURNING` yield the existing id on conflict, so
/// concurrent runs inserting the same new name converge on one row.
pub async fn upsert_region(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> Result<i32, StoreError> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO regions (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING region_id
        "#,
    )
    .bind(name)
    .fetch_one(&mut **tx)
    .await
    .map_err(StoreError::new("upsert region"))
}

/// Insert-or-get a payment method by name in one round trip
pub async fn upsert_payment_method(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> Result<i32, StoreError> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO payment_methods (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING payment_method_id
        "#,
    )
    .bind(name)
    .fetch_one(&mut **tx)
    .await
    .map_err(StoreError::new("upsert payment method"))
}

/// Insert a customer, or overwrite its attributes with the latest values
pub async fn upsert_customer(
    tx: &mut Transaction<'_, Postgres>,
    record: &SalesRecord,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO customers (customer_id, name, email, address)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (customer_id) DO UPDATE
        SET name = EXCLUDED.name,
            email = EXCLUDED.email,
            address = EXCLUDED.address
        "#,
    )
    .bind(&record.customer_id)
    .bind(&record.customer_name)
    .bind(&record.customer_email)
    .bind(&record.customer_address)
    .execute(&mut **tx)
    .await
    .map_err(StoreError::new("upsert customer"))?;

    Ok(())
}

/// Insert a product, or overwrite its attributes with the latest values
pub async fn upsert_product(
    tx: &mut Transaction<'_, Postgres>,
    record: &SalesRecord,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO products (product_id, name, category)
        VALUES ($1, $2, $3)
        ON CONFLICT (product_id) DO UPDATE
        SET name = EXCLUDED.name,
            category = EXCLUDED.category
        "#,
    )
    .bind(&record.product_id)
    .bind(&record.product_name)
    .bind(&record.category)
    .execute(&mut **tx)
    .await
    .map_err(StoreError::new("upsert product"))?;

    Ok(())
}
