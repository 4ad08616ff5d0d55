//! Batch pipeline controller
//!
//! A refresh run loads one source file into the sales tables inside a single
//! transaction:
//!
//! 1. Create the STARTED log row (pool, outside the transaction)
//! 2. Open the source, read the header, build the column index
//! 3. Begin the transaction, optionally taking the refresh advisory lock
//! 4. Read records in batches; parse, resolve and upsert each one in order
//! 5. Commit when the source is exhausted
//! 6. Close the log row as COMPLETED or FAILED (pool, outside the transaction)
//!
//! Any failure after step 3 drops the transaction, which rolls it back. The
//! wall-clock cap and shutdown cancellation only interrupt steps 2-4; once
//! the commit is issued the run always reaches step 6. The row counter lives
//! on the run rather than inside the load future, so the count reached before
//! a failure, timeout or cancellation is still recorded.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use csv_async::{AsyncReaderBuilder, StringRecord};
use sqlx::{PgPool, Postgres, Transaction};
use tokio::fs::File;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::config::IngestConfig;
use super::error::{IngestError, RefreshFailure};
use super::models::RefreshSummary;
use super::observer::{RefreshObserver, TracingObserver};
use super::orders::upsert_order;
use super::parser::{parse_record, ColumnIndex};
use super::refresh_log::{complete_refresh, start_refresh};
use super::resolver::resolve_references;

/// Advisory lock key held by a run when runs are serialized
pub const REFRESH_LOCK_KEY: i64 = 0x5341_4C45_5352_4546;

/// Reusable entry point for refresh runs
///
/// Cheap to share behind an `Arc`; every call to [`refresh_data`](Self::refresh_data)
/// builds and consumes its own run.
#[derive(Clone)]
pub struct RefreshPipeline {
    pool: PgPool,
    config: IngestConfig,
    observer: Arc<dyn RefreshObserver>,
    cancel: CancellationToken,
}

impl RefreshPipeline {
    pub fn new(pool: PgPool, config: IngestConfig) -> Self {
        Self {
            pool,
            config,
            observer: Arc::new(TracingObserver),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the default tracing observer
    pub fn with_observer(mut self, observer: Arc<dyn RefreshObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn default_source(&self) -> &Path {
        &self.config.default_source_path
    }

    /// Abort every run that has not yet issued its commit
    ///
    /// Affected runs roll back and close their log rows as FAILED. Runs
    /// started afterwards fail immediately.
    pub fn cancel_runs(&self) {
        self.cancel.cancel();
    }

    /// Load `source` into the sales tables as one atomic run
    ///
    /// The outcome is also recorded in `data_refresh_logs` under the returned
    /// `log_id`, tagged with `triggered_by`.
    pub async fn refresh_data(
        &self,
        source: impl AsRef<Path>,
        triggered_by: &str,
    ) -> Result<RefreshSummary, RefreshFailure> {
        let source = source.as_ref();

        let log_id = match start_refresh(&self.pool, triggered_by).await {
            Ok(log_id) => log_id,
            Err(error) => {
                self.observer.run_failed(None, 0, &error);
                return Err(RefreshFailure {
                    log_id: None,
                    rows_processed: 0,
                    error,
                });
            },
        };

        self.observer.run_started(log_id, source, triggered_by);

        RefreshRun {
            pipeline: self,
            log_id,
            source: source.to_path_buf(),
            rows_processed: 0,
        }
        .execute()
        .await
    }
}

/// One run of the pipeline, consumed by [`execute`](Self::execute)
struct RefreshRun<'a> {
    pipeline: &'a RefreshPipeline,
    log_id: i64,
    source: PathBuf,
    rows_processed: u64,
}

impl RefreshRun<'_> {
    async fn execute(mut self) -> Result<RefreshSummary, RefreshFailure> {
        let outcome = self.load().await;

        let pool = &self.pipeline.pool;
        let observer = &self.pipeline.observer;

        match outcome {
            Ok(()) => {
                if let Err(error) = complete_refresh(pool, self.log_id, self.rows_processed, None).await
                {
                    observer.run_failed(Some(self.log_id), self.rows_processed, &error);
                    return Err(RefreshFailure {
                        log_id: Some(self.log_id),
                        rows_processed: self.rows_processed,
                        error,
                    });
                }

                let summary = RefreshSummary {
                    log_id: self.log_id,
                    rows_processed: self.rows_processed,
                };
                observer.run_completed(&summary);
                Ok(summary)
            },
            Err(error) => {
                if let Err(log_error) =
                    complete_refresh(pool, self.log_id, self.rows_processed, Some(&error)).await
                {
                    warn!(
                        log_id = self.log_id,
                        error = %log_error,
                        "Failed to record refresh failure"
                    );
                }

                observer.run_failed(Some(self.log_id), self.rows_processed, &error);
                Err(RefreshFailure {
                    log_id: Some(self.log_id),
                    rows_processed: self.rows_processed,
                    error,
                })
            },
        }
    }

    async fn load(&mut self) -> Result<(), IngestError> {
        let cancel = self.pipeline.cancel.clone();
        let run_timeout = self.pipeline.config.run_timeout();
        let expired = async move {
            match run_timeout {
                Some(limit) => {
                    tokio::time::sleep(limit).await;
                    limit
                },
                None => std::future::pending::<Duration>().await,
            }
        };

        let tx = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(IngestError::Cancelled),
            limit = expired => return Err(IngestError::Timeout(limit)),
            staged = self.stage() => staged?,
        };

        tx.commit().await.map_err(IngestError::transaction("commit"))?;

        Ok(())
    }

    /// Read the whole source into an open transaction, ready to commit
    async fn stage(&mut self) -> Result<Transaction<'static, Postgres>, IngestError> {
        let file = File::open(&self.source)
            .await
            .map_err(|source| IngestError::SourceOpen {
                path: self.source.clone(),
                source,
            })?;

        let mut reader = AsyncReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .create_reader(file);

        let header = reader.headers().await.map_err(IngestError::Header)?;
        if header.is_empty() {
            return Err(IngestError::EmptySource);
        }
        let columns = ColumnIndex::from_header(header);

        let missing = columns.missing_columns();
        if !missing.is_empty() {
            warn!(log_id = self.log_id, ?missing, "Source header is missing required columns");
        }

        let mut tx = self
            .pipeline
            .pool
            .begin()
            .await
            .map_err(IngestError::transaction("begin"))?;

        if self.pipeline.config.serialize_runs {
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(REFRESH_LOCK_KEY)
                .execute(&mut *tx)
                .await
                .map_err(IngestError::transaction("advisory lock"))?;
            debug!(log_id = self.log_id, "Acquired refresh advisory lock");
        }

        let batch_size = self.pipeline.config.batch_size.max(1);
        let mut record = StringRecord::new();
        let mut batch: u64 = 0;

        loop {
            batch += 1;
            let mut batch_rows = 0usize;

            while batch_rows < batch_size {
                let has_record = reader.read_record(&mut record).await.map_err(|source| {
                    let line = source
                        .position()
                        .map(|p| p.line())
                        .unwrap_or(self.rows_processed + 2);
                    IngestError::Read { line, source }
                })?;
                if !has_record {
                    break;
                }

                let row = self.rows_processed + 1;
                let sales = parse_record(&record, &columns)
                    .map_err(|source| IngestError::Record { row, source })?;
                let refs = resolve_references(&mut tx, &sales)
                    .await
                    .map_err(|source| IngestError::Store { row, source })?;
                upsert_order(&mut tx, &sales, refs)
                    .await
                    .map_err(|source| IngestError::Store { row, source })?;

                batch_rows += 1;
                self.rows_processed += 1;
            }

            if batch_rows == 0 {
                break;
            }

            self.pipeline
                .observer
                .batch_processed(self.log_id, batch, batch_rows, self.rows_processed);
        }

        Ok(tx)
    }
}
