//! Error types for Anguli

use std::time::SystemTime;

use crate::telemetry::RunId;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Anguli error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Empty or malformed minutia set, inconsistent ids, unknown image
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Wall clock observed going backwards between run start and end
    #[error("Clock error: run end {end:?} precedes run start {start:?}")]
    Clock {
        /// Timestamp stamped at `begin_run`
        start: SystemTime,
        /// Timestamp observed at `end_run`
        end: SystemTime,
    },

    /// Run was already finalized
    #[error("Run {0} is already closed")]
    RunClosed(RunId),

    /// Worker thread could not be spawned or panicked
    #[error("Worker error: {0}")]
    Worker(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// True for input errors, which never succeed on retry.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}
