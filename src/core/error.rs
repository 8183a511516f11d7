//! Error types for dispatch operations.

use thiserror::Error;

use super::job::Job;

/// Admission outcome of a rejected submission.
///
/// The rejected [`Job`] is handed back so the caller can shed or retry it.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The shared queue is at capacity.
    #[error("job queue is full")]
    QueueFull(Job),
    /// Shutdown has begun; the queue no longer accepts writes.
    #[error("worker pool is shutting down")]
    ShuttingDown(Job),
}

impl SubmitError {
    /// Recover the job that was not admitted.
    #[must_use]
    pub fn into_job(self) -> Job {
        match self {
            Self::QueueFull(job) | Self::ShuttingDown(job) => job,
        }
    }
}

/// Errors produced by worker pool lifecycle operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// `start` was called on a pool whose workers already run.
    #[error("worker pool already started")]
    AlreadyStarted,
    /// The pool has begun shutting down.
    #[error("worker pool is shutting down")]
    ShuttingDown,
    /// An OS thread could not be spawned.
    #[error("failed to spawn {name}: {source}")]
    Spawn {
        /// Name of the thread that failed to start.
        name: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// Internal failure (waiter task cancelled, etc.).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
