//! Detached refresh runs
//!
//! The HTTP trigger and the scheduler hand runs to a [`RefreshRunner`] and
//! return immediately. Every spawned run is tracked so shutdown can stop
//! accepting work and wait a bounded time for what is still in flight.
//! Runs that outlive the grace period are cancelled before they commit.

use std::{path::PathBuf, sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use super::error::RefreshFailure;
use super::models::RefreshSummary;
use super::pipeline::RefreshPipeline;

/// How long cancelled runs get to roll back and close their log rows
pub const CANCEL_DRAIN: Duration = Duration::from_secs(5);

pub type RunHandle = JoinHandle<Result<RefreshSummary, RefreshFailure>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("refresh runner is shutting down")]
    ShuttingDown,
}

/// Spawns refresh runs onto the runtime and tracks them until they finish
#[derive(Clone)]
pub struct RefreshRunner {
    pipeline: Arc<RefreshPipeline>,
    tracker: TaskTracker,
}

impl RefreshRunner {
    pub fn new(pipeline: Arc<RefreshPipeline>) -> Self {
        Self {
            pipeline,
            tracker: TaskTracker::new(),
        }
    }

    pub fn pipeline(&self) -> &RefreshPipeline {
        &self.pipeline
    }

    /// Start a run in the background
    ///
    /// The run records its own outcome in the refresh log; the handle is
    /// only needed by callers that want to observe it directly.
    pub fn submit(
        &self,
        source: PathBuf,
        triggered_by: impl Into<String>,
    ) -> Result<RunHandle, SubmitError> {
        if self.tracker.is_closed() {
            return Err(SubmitError::ShuttingDown);
        }

        let pipeline = Arc::clone(&self.pipeline);
        let triggered_by = triggered_by.into();

        Ok(self
            .tracker
            .spawn(async move { pipeline.refresh_data(&source, &triggered_by).await }))
    }

    /// Number of runs still in flight
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_accepting(&self) -> bool {
        !self.tracker.is_closed()
    }

    /// Stop accepting runs and wait up to `grace` for in-flight ones
    ///
    /// Returns `false` if runs were still going when the grace period ran
    /// out. Those runs are cancelled: their transactions roll back and their
    /// log rows close as FAILED, waiting at most [`CANCEL_DRAIN`] for that.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.tracker.close();

        let in_flight = self.tracker.len();
        if in_flight > 0 {
            info!(in_flight, grace_secs = grace.as_secs(), "Waiting for refresh runs to finish");
        }

        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    in_flight = self.tracker.len(),
                    "Refresh runs still in flight after shutdown grace period; cancelling"
                );
                self.pipeline.cancel_runs();

                if tokio::time::timeout(CANCEL_DRAIN, self.tracker.wait())
                    .await
                    .is_err()
                {
                    warn!(
                        in_flight = self.tracker.len(),
                        "Cancelled refresh runs did not record their outcome"
                    );
                }
                false
            },
        }
    }
}
