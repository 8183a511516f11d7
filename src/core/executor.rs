//! Job execution trait and the default simulated workload.

use std::time::Duration;

use async_trait::async_trait;

use super::job::Job;

/// Abstraction for running one job to completion on a worker.
///
/// Execution never fails: there is no error channel from a job back to the
/// pool. The worker around it handles the start/complete diagnostics, so
/// implementations only do the work itself.
///
/// # Threading
///
/// Each worker owns a dedicated OS thread with its own single-threaded tokio
/// runtime. `execute` is driven by that runtime, so blocking here stalls only
/// the calling worker.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use lunar_dispatch::core::{Job, JobExecutor};
///
/// #[derive(Clone)]
/// struct Echo;
///
/// #[async_trait]
/// impl JobExecutor for Echo {
///     async fn execute(&self, worker_id: usize, job: Job) {
///         println!("worker {worker_id} got {}", job.id());
///     }
/// }
/// ```
#[async_trait]
pub trait JobExecutor: Send + Sync + Clone + 'static {
    /// Run `job` on worker `worker_id`.
    async fn execute(&self, worker_id: usize, job: Job);
}

/// Placeholder workload: holds the worker for a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedWork {
    duration: Duration,
}

impl SimulatedWork {
    /// Default simulated work duration.
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(1);

    /// Simulate jobs that take `duration` each.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Simulated duration of one job.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for SimulatedWork {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION)
    }
}

#[async_trait]
impl JobExecutor for SimulatedWork {
    async fn execute(&self, _worker_id: usize, _job: Job) {
        tokio::time::sleep(self.duration).await;
    }
}
