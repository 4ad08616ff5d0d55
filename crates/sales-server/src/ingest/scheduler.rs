//! Cron trigger for refresh runs
//!
//! Registers one job that hands a run for the default source to the
//! [`RefreshRunner`], tagged `SCHEDULER`. The run's wall-clock cap comes from
//! the pipeline configuration.

use std::path::PathBuf;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{info, warn};

use super::refresh_log::TRIGGER_SCHEDULER;
use super::runner::RefreshRunner;

pub struct RefreshScheduler {
    scheduler: JobScheduler,
    schedule: String,
}

impl RefreshScheduler {
    /// Build the scheduler, register the refresh job and start ticking
    pub async fn start(
        runner: RefreshRunner,
        schedule: &str,
        source: PathBuf,
    ) -> Result<Self, JobSchedulerError> {
        let scheduler = JobScheduler::new().await?;

        let job = Job::new_async(schedule, move |_uuid, _l| {
            let runner = runner.clone();
            let source = source.clone();
            Box::pin(async move {
                info!(source = %source.display(), "Scheduled data refresh triggered");
                // The run records its own outcome; the handle is not needed
                if let Err(e) = runner.submit(source, TRIGGER_SCHEDULER) {
                    warn!(error = %e, "Scheduled refresh skipped");
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!(schedule, "Refresh scheduler started");

        Ok(Self {
            scheduler,
            schedule: schedule.to_string(),
        })
    }

    pub fn schedule(&self) -> &str {
        &self.schedule
    }

    /// Stop firing; runs already handed to the runner are unaffected
    pub async fn shutdown(mut self) -> Result<(), JobSchedulerError> {
        self.scheduler.shutdown().await?;
        info!("Refresh scheduler stopped");
        Ok(())
    }
}
