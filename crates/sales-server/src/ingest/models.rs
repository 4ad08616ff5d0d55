//! Typed records flowing through the ingestion pipeline

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::types::BigDecimal;

/// One validated line of the sales source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    pub order_id: String,
    pub product_id: String,
    pub customer_id: String,
    pub product_name: String,
    pub category: String,
    pub region: String,
    pub sale_date: NaiveDate,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub discount: BigDecimal,
    pub shipping_cost: BigDecimal,
    pub payment_method: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
}

/// Surrogate ids for the reference rows a record depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRefs {
    pub region_id: i32,
    pub payment_method_id: i32,
}

/// Outcome of a successful refresh run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub log_id: i64,
    pub rows_processed: u64,
}
