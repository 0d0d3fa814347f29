//! Error type shared by the record store and the controllers.
//!
//! Command-level code works with `anyhow::Result`; the storage layer and the
//! controllers report failures through [`SleepError`] so callers can tell a
//! benign miss (`NotFound`) from a real fault (`Storage`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SleepError {
    /// Reading or writing the nights table failed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The blocking storage task panicked or was aborted before returning.
    #[error("storage task failed: {0}")]
    Background(#[from] tokio::task::JoinError),

    /// The referenced night no longer exists.
    #[error("night {0} not found")]
    NotFound(i64),

    /// An insert reused an id that is already taken.
    #[error("night {0} already exists")]
    DuplicateId(i64),

    /// The command is not valid in the controller's current state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Quality ratings must lie within [-1, 5].
    #[error("quality {0} is out of range")]
    InvalidQuality(i32),

    /// The controller was torn down before the command completed.
    #[error("controller cancelled")]
    Cancelled,
}

impl SleepError {
    /// Whether the error is a storage fault that a caller may retry.
    pub fn is_storage(&self) -> bool {
        matches!(self, SleepError::Storage(_) | SleepError::Background(_))
    }
}

pub type SleepResult<T> = Result<T, SleepError>;
