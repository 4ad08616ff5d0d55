//! Test helpers for sales server integration tests
//!
//! - CSV fixture builders written to temporary files
//! - Pipeline construction with test-friendly settings
//! - Row counting and refresh log lookups
#![allow(dead_code)]

pub mod fixtures;

use std::sync::{Arc, Mutex};

use sales_server::ingest::{
    refresh_log::{get_refresh_log, RefreshLog},
    IngestConfig, IngestError, RefreshObserver, RefreshPipeline, RefreshSummary,
};
use sqlx::PgPool;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Ingest settings for tests: no cron trigger, no wall-clock cap
pub fn test_config() -> IngestConfig {
    IngestConfig {
        schedule_enabled: false,
        run_timeout_secs: 0,
        ..IngestConfig::default()
    }
}

pub fn pipeline(pool: &PgPool) -> RefreshPipeline {
    RefreshPipeline::new(pool.clone(), test_config())
}

pub fn pipeline_with(pool: &PgPool, config: IngestConfig) -> RefreshPipeline {
    RefreshPipeline::new(pool.clone(), config)
}

/// Row count of `table`
pub async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}

pub async fn refresh_log(pool: &PgPool, log_id: i64) -> RefreshLog {
    get_refresh_log(pool, log_id)
        .await
        .expect("Failed to query refresh log")
        .expect("Refresh log row missing")
}

/// Observer that records batch progress for assertions
#[derive(Default)]
pub struct RecordingObserver {
    pub batches: Mutex<Vec<(u64, usize, u64)>>,
    pub completed: Mutex<Vec<RefreshSummary>>,
    pub failed: Mutex<Vec<(Option<i64>, u64, String)>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl RefreshObserver for RecordingObserver {
    fn run_started(&self, _log_id: i64, _source: &std::path::Path, _triggered_by: &str) {}

    fn batch_processed(&self, _log_id: i64, batch: u64, batch_rows: usize, rows_processed: u64) {
        self.batches
            .lock()
            .unwrap()
            .push((batch, batch_rows, rows_processed));
    }

    fn run_completed(&self, summary: &RefreshSummary) {
        self.completed.lock().unwrap().push(summary.clone());
    }

    fn run_failed(&self, log_id: Option<i64>, rows_processed: u64, error: &IngestError) {
        self.failed
            .lock()
            .unwrap()
            .push((log_id, rows_processed, error.to_string()));
    }
}
