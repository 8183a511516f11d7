//! Core dispatch abstractions: jobs, workers, the pool and its signals.

pub mod error;
pub mod executor;
pub mod job;
pub mod signal;
pub mod worker_pool;

pub use error::{AppResult, PoolError, SubmitError};
pub use executor::{JobExecutor, SimulatedWork};
pub use job::{Job, JobId, Payload};
pub use signal::StoppedSignal;
pub use worker_pool::{JobSubmitter, PoolStats, WorkerPool};
