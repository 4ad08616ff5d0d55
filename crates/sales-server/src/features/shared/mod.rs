//! Shared utilities and types for feature modules
//!
//! - **date_range**: optional start/end query parameters with trailing-year defaults

pub mod date_range;

pub use date_range::{DateRange, DateRangeParams};
