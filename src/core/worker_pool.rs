//! Fixed-size worker pool draining one shared bounded job queue.
//!
//! The pool owns a `crossbeam-channel` bounded queue and N workers, each on
//! its own OS thread. Every worker blocks in a `Select` over the shared queue
//! and its own private stop line, so nothing polls.
//!
//! # Key Features
//!
//! - **Admission control**: `submit` never blocks; a full queue rejects the job
//! - **Stop lines**: shutdown signals each worker on its own channel
//! - **Completion tracking**: a waiter thread joins every worker, then fires
//!   the pool's [`StoppedSignal`](crate::core::StoppedSignal)
//!
//! # Example
//!
//! ```rust,ignore
//! use lunar_dispatch::config::WorkerPoolConfig;
//! use lunar_dispatch::core::{Job, SimulatedWork, WorkerPool};
//!
//! let pool = WorkerPool::new(
//!     WorkerPoolConfig::new().with_worker_count(2).with_queue_capacity(1000),
//!     SimulatedWork::default(),
//! )?;
//! pool.start()?;
//! let id = pool.submit(Job::new(payload))?;
//! pool.shutdown();
//! pool.stopped().wait();
//! ```

mod pool;
mod worker;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::error::SubmitError;
use super::job::{Job, JobId};

pub use pool::WorkerPool;

/// Submission boundary consumed by the dispatch endpoint.
///
/// Implementations must be non-blocking and safe to call concurrently.
pub trait JobSubmitter: Send + Sync {
    /// Offer a job to the pool.
    ///
    /// # Errors
    ///
    /// - `SubmitError::QueueFull` if there is no spare queue capacity
    /// - `SubmitError::ShuttingDown` if shutdown has begun
    fn submit(&self, job: Job) -> Result<JobId, SubmitError>;

    /// Current utilization snapshot.
    fn stats(&self) -> PoolStats;
}

/// Statistics about pool utilization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Number of worker threads.
    pub worker_count: usize,

    /// Capacity of the shared queue.
    pub queue_capacity: usize,

    /// Jobs waiting in the queue.
    pub queued_jobs: u64,

    /// Jobs currently executing.
    pub active_jobs: u64,

    /// Submissions admitted to the queue.
    pub accepted_jobs: u64,

    /// Submissions rejected because the queue was full.
    pub rejected_jobs: u64,

    /// Jobs that ran to completion.
    pub completed_jobs: u64,

    /// Queued jobs dropped at shutdown without running.
    pub discarded_jobs: u64,
}

/// Internal counters for pool statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    pub active: AtomicU64,
    pub accepted: AtomicU64,
    pub rejected: AtomicU64,
    pub completed: AtomicU64,
    pub discarded: AtomicU64,
}

impl PoolCounters {
    /// Get a snapshot of current statistics.
    pub fn snapshot(&self, worker_count: usize, queue_capacity: usize, queued: usize) -> PoolStats {
        PoolStats {
            worker_count,
            queue_capacity,
            queued_jobs: queued as u64,
            active_jobs: self.active.load(Ordering::Relaxed),
            accepted_jobs: self.accepted.load(Ordering::Relaxed),
            rejected_jobs: self.rejected.load(Ordering::Relaxed),
            completed_jobs: self.completed.load(Ordering::Relaxed),
            discarded_jobs: self.discarded.load(Ordering::Relaxed),
        }
    }
}
