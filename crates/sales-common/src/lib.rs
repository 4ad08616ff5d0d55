//! Sales Analytics Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the sales analytics workspace.
//!
//! - **Error Handling**: [`SalesError`] and the [`Result`] alias
//! - **Logging**: process-wide `tracing` subscriber setup in [`logging`]
//! - **Dates**: strict calendar-date parsing shared by ingestion and reporting

pub mod dates;
pub mod error;
pub mod logging;

pub use error::{Result, SalesError};
