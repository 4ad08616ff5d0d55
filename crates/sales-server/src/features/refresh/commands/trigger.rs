//! Trigger refresh command
//!
//! Hands a run to the [`RefreshRunner`] and returns without waiting for it.
//! The outcome is only visible through the refresh log.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ingest::refresh_log::TRIGGER_API;
use crate::ingest::{RefreshRunner, SubmitError};

/// Command to start a refresh run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerRefreshCommand {
    /// Source file to load; the configured default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Acknowledgement for an accepted run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRefreshResponse {
    pub message: String,
    pub file_path: String,
    pub triggered_by: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TriggerRefreshError {
    #[error("File path cannot be blank")]
    BlankFilePath,

    #[error(transparent)]
    Unavailable(#[from] SubmitError),
}

impl TriggerRefreshCommand {
    pub fn validate(&self) -> Result<(), TriggerRefreshError> {
        match &self.file_path {
            Some(path) if path.trim().is_empty() => Err(TriggerRefreshError::BlankFilePath),
            _ => Ok(()),
        }
    }
}

#[tracing::instrument(skip(runner))]
pub fn handle(
    runner: &RefreshRunner,
    command: TriggerRefreshCommand,
) -> Result<TriggerRefreshResponse, TriggerRefreshError> {
    command.validate()?;

    let source = match command.file_path {
        Some(path) => PathBuf::from(path),
        None => runner.pipeline().default_source().to_path_buf(),
    };

    // Detached: the handle is dropped and the run reports through the log
    let _handle = runner.submit(source.clone(), TRIGGER_API)?;

    tracing::info!(source = %source.display(), "Data refresh submitted");

    Ok(TriggerRefreshResponse {
        message: "Data refresh triggered successfully".to_string(),
        file_path: source.display().to_string(),
        triggered_by: TRIGGER_API.to_string(),
    })
}
