//! Data refresh feature module
//!
//! On-demand refresh runs and read access to the refresh audit log.
//! Runs are detached: the trigger only acknowledges submission.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::refresh_routes;
