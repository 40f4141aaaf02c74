//! Error types for the hot-reload watcher.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end the watcher task.
///
/// Per-file load failures are not here; they are reported and the watcher
/// keeps running.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Cannot watch {path}: {reason}")]
    Subscription { path: PathBuf, reason: String },

    #[error("File system event channel closed unexpectedly")]
    ChannelClosed,
}

impl WatchError {
    pub(crate) fn subscription(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        WatchError::Subscription {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
