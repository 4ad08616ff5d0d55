//! Progress reporting for refresh runs

use std::path::Path;

use tracing::{error, info};

use super::error::IngestError;
use super::models::RefreshSummary;

/// Receives lifecycle and progress events from a refresh run
///
/// Implementations must be cheap; they are called inline on the run's task.
pub trait RefreshObserver: Send + Sync {
    fn run_started(&self, log_id: i64, source: &Path, triggered_by: &str);

    /// Called once per non-empty batch with the cumulative row count
    fn batch_processed(&self, log_id: i64, batch: u64, batch_rows: usize, rows_processed: u64);

    fn run_completed(&self, summary: &RefreshSummary);

    fn run_failed(&self, log_id: Option<i64>, rows_processed: u64, error: &IngestError);
}

/// Emits every event into the process-wide `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RefreshObserver for TracingObserver {
    fn run_started(&self, log_id: i64, source: &Path, triggered_by: &str) {
        info!(log_id, source = %source.display(), triggered_by, "Data refresh started");
    }

    fn batch_processed(&self, log_id: i64, batch: u64, batch_rows: usize, rows_processed: u64) {
        info!(log_id, batch, batch_rows, rows_processed, "Processed batch");
    }

    fn run_completed(&self, summary: &RefreshSummary) {
        info!(
            log_id = summary.log_id,
            rows_processed = summary.rows_processed,
            "Data refresh completed"
        );
    }

    fn run_failed(&self, log_id: Option<i64>, rows_processed: u64, error: &IngestError) {
        error!(?log_id, rows_processed, error = %error, "Data refresh failed");
    }
}
