//! Sales Analytics Server Library
//!
//! HTTP server and batch loader for retail sales data.
//!
//! # Overview
//!
//! - **Ingestion**: batched CSV loads into PostgreSQL, one transaction per run,
//!   recorded in the `data_refresh_logs` table ([`ingest`])
//! - **Scheduling**: a cron job that refreshes from the default source
//! - **API Endpoints**: revenue aggregations and refresh control ([`features`])
//! - **Configuration**: environment-based configuration management ([`config`])
//! - **Middleware**: CORS and request tracing ([`middleware`])
//!
//! # Refresh runs
//!
//! A run reads the source in batches of `REFRESH_BATCH_SIZE` records. Every
//! record is parsed, its region, payment method, customer and product are
//! upserted, then the order header and line item are written. Any failure
//! rolls back the whole run and the refresh log records the error together
//! with the number of rows processed before it.
//!
//! # Example
//!
//! ```no_run
//! use sales_server::{api, config::Config, db, features::FeatureState, ingest};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let pipeline = ingest::RefreshPipeline::new(pool.clone(), config.ingest.clone());
//!     let runner = ingest::RefreshRunner::new(Arc::new(pipeline));
//!     let app = api::create_router(FeatureState { db: pool, runner }, &config.cors);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod ingest;
pub mod middleware;

// Re-export commonly used types
pub use error::AppError;
