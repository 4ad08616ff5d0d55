//! Refresh commands

pub mod trigger;

pub use trigger::{TriggerRefreshCommand, TriggerRefreshError, TriggerRefreshResponse};
