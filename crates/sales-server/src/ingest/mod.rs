//! Sales data ingestion
//!
//! Loads a delimited sales file into the normalized tables as one atomic
//! refresh run, with a per-run audit row in `data_refresh_logs`.
//!
//! # Architecture
//!
//! - **parser**: raw CSV record + header column index -> [`SalesRecord`]
//! - **resolver**: region, payment method, customer and product upserts
//! - **orders**: order header insert-or-skip and line item append
//! - **pipeline**: batch controller owning the transaction and run lifecycle
//! - **refresh_log**: audit rows written outside the run's transaction
//! - **observer**: progress and lifecycle events (tracing by default)
//! - **runner**: detached, tracked runs with bounded shutdown
//! - **scheduler**: cron trigger feeding the runner
//!
//! Runs are triggered over HTTP through `features::refresh` or by the
//! scheduler; both go through the same [`RefreshRunner`].

pub mod config;
pub mod error;
pub mod models;
pub mod observer;
pub mod orders;
pub mod parser;
pub mod pipeline;
pub mod refresh_log;
pub mod resolver;
pub mod runner;
pub mod scheduler;

pub use config::IngestConfig;
pub use error::{IngestError, MissingCause, ParseError, RefreshFailure, StoreError};
pub use models::{RefreshSummary, SalesRecord};
pub use observer::{RefreshObserver, TracingObserver};
pub use pipeline::RefreshPipeline;
pub use runner::{RefreshRunner, SubmitError};
pub use scheduler::RefreshScheduler;
