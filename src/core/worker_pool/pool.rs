//! `WorkerPool`: shared bounded queue, fixed worker set, start/stop protocol.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::config::WorkerPoolConfig;
use crate::core::error::{PoolError, SubmitError};
use crate::core::executor::JobExecutor;
use crate::core::job::{Job, JobId};
use crate::core::signal::StoppedSignal;

use super::worker::{thread_name, StopLine, Worker};
use super::{JobSubmitter, PoolCounters, PoolStats};

const WAITER_THREAD_NAME: &str = "dispatch-pool-waiter";

/// Where the pool is in its one-way lifecycle.
enum Lifecycle {
    /// Constructed; workers exist but no thread runs yet.
    Idle(Vec<Worker>),
    /// Workers and the completion waiter are running.
    Running,
    /// Shutdown has begun (possibly already complete).
    Stopping,
}

/// Fixed pool of worker threads draining one shared bounded job queue.
///
/// # Design
///
/// - **No polling**: workers block on the queue and their stop line at once
/// - **Non-blocking admission**: `submit` uses `try_send` and rejects when full
/// - **One-way lifecycle**: idle, running, stopping; workers never restart
pub struct WorkerPool<E: JobExecutor> {
    /// Pool configuration.
    config: WorkerPoolConfig,

    /// Executor cloned into every worker on start.
    executor: E,

    /// Queue sender. `None` once shutdown has closed the queue.
    queue_tx: RwLock<Option<Sender<Job>>>,

    /// Queue receiver, cloned into workers; the pool uses it to discard
    /// leftovers at shutdown and to report queue depth.
    queue_rx: Receiver<Job>,

    /// One private stop line per worker, in worker id order.
    stop_lines: Vec<StopLine>,

    /// Lifecycle state; only start and shutdown take this lock.
    lifecycle: Mutex<Lifecycle>,

    /// Fast-path shutdown flag for `submit`.
    shutting_down: AtomicBool,

    /// Statistics counters (lock-free atomics).
    counters: Arc<PoolCounters>,

    /// Fired once every worker has exited.
    stopped: StoppedSignal,
}

impl<E: JobExecutor> WorkerPool<E> {
    /// Create a pool of `config.worker_count` workers (ids `1..=N`) sharing a
    /// queue of `config.queue_capacity` jobs. No thread is started.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: WorkerPoolConfig, executor: E) -> Result<Self, PoolError> {
        config.validate().map_err(PoolError::InvalidConfig)?;

        let (queue_tx, queue_rx) = bounded::<Job>(config.queue_capacity);
        let (workers, stop_lines): (Vec<_>, Vec<_>) =
            (1..=config.worker_count).map(Worker::new).unzip();

        debug!(
            worker_count = config.worker_count,
            queue_capacity = config.queue_capacity,
            "WorkerPool created"
        );

        Ok(Self {
            config,
            executor,
            queue_tx: RwLock::new(Some(queue_tx)),
            queue_rx,
            stop_lines,
            lifecycle: Mutex::new(Lifecycle::Idle(workers)),
            shutting_down: AtomicBool::new(false),
            counters: Arc::new(PoolCounters::default()),
            stopped: StoppedSignal::new(),
        })
    }

    /// Launch every worker on its own thread plus one waiter thread that
    /// joins them all and then fires [`stopped`](Self::stopped).
    ///
    /// The waiter starts first and receives each worker's handle as the worker
    /// is launched, so every running worker is tracked before it can exit.
    ///
    /// # Errors
    ///
    /// - `PoolError::AlreadyStarted` if the workers already run
    /// - `PoolError::ShuttingDown` if shutdown has begun
    /// - `PoolError::Spawn` if a thread could not be created; workers already
    ///   launched are stopped and the pool moves to shutdown
    pub fn start(&self) -> Result<(), PoolError> {
        let mut lifecycle = self.lifecycle.lock();
        let workers = match std::mem::replace(&mut *lifecycle, Lifecycle::Running) {
            Lifecycle::Idle(workers) => workers,
            Lifecycle::Running => return Err(PoolError::AlreadyStarted),
            Lifecycle::Stopping => {
                *lifecycle = Lifecycle::Stopping;
                return Err(PoolError::ShuttingDown);
            }
        };

        let (handles_tx, handles_rx) = unbounded::<(usize, JoinHandle<()>)>();
        let stopped = self.stopped.clone();
        let waiter = thread::Builder::new()
            .name(WAITER_THREAD_NAME.to_owned())
            .spawn(move || {
                // Ends once start() drops its sender and every worker joined.
                for (worker_id, handle) in handles_rx {
                    join_worker(worker_id, handle);
                }
                info!("All workers have stopped");
                stopped.fire();
            });
        if let Err(source) = waiter {
            error!(error = %source, "Failed to spawn pool waiter thread");
            *lifecycle = Lifecycle::Idle(workers);
            return Err(PoolError::Spawn {
                name: WAITER_THREAD_NAME.to_owned(),
                source,
            });
        }

        for worker in workers {
            let worker_id = worker.id();
            let spawned = worker.start(
                self.queue_rx.clone(),
                self.executor.clone(),
                Arc::clone(&self.counters),
                self.config.thread_stack_size,
            );
            match spawned {
                Ok(handle) => {
                    // The waiter only exits after this sender drops.
                    let _ = handles_tx.send((worker_id, handle));
                }
                Err(source) => {
                    error!(worker_id, error = %source, "Failed to spawn worker thread");
                    *lifecycle = Lifecycle::Stopping;
                    drop(lifecycle);
                    drop(handles_tx);
                    self.close();
                    return Err(PoolError::Spawn {
                        name: thread_name(worker_id),
                        source,
                    });
                }
            }
        }

        info!(
            worker_count = self.config.worker_count,
            queue_capacity = self.config.queue_capacity,
            "WorkerPool started with dedicated OS threads"
        );
        Ok(())
    }

    /// Offer `job` to the shared queue without blocking.
    ///
    /// Submissions made before [`start`](Self::start) are queued and picked
    /// up once workers run.
    ///
    /// # Errors
    ///
    /// - `SubmitError::QueueFull` if the queue is at capacity
    /// - `SubmitError::ShuttingDown` if shutdown has begun
    pub fn submit(&self, job: Job) -> Result<JobId, SubmitError> {
        if self.shutting_down.load(Ordering::Acquire) {
            return Err(SubmitError::ShuttingDown(job));
        }

        // Shared guard: it only protects the sender's presence, the channel
        // itself serializes queue access.
        let queue_tx = self.queue_tx.read();
        let Some(tx) = queue_tx.as_ref() else {
            return Err(SubmitError::ShuttingDown(job));
        };

        let job_id = job.id().clone();
        match tx.try_send(job) {
            Ok(()) => {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                debug!(job_id = %job_id, "Job queued");
                Ok(job_id)
            }
            Err(TrySendError::Full(job)) => {
                self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                warn!(job_id = %job_id, "Worker pool queue is full");
                Err(SubmitError::QueueFull(job))
            }
            Err(TrySendError::Disconnected(job)) => Err(SubmitError::ShuttingDown(job)),
        }
    }

    /// Signal every worker's stop line, then close the queue.
    ///
    /// Does not wait: wait on [`stopped`](Self::stopped) for that. Jobs still
    /// queued once the queue is closed are discarded, not run. Returns `true`
    /// if this call began shutdown, `false` if it had already begun.
    pub fn shutdown(&self) -> bool {
        let mut lifecycle = self.lifecycle.lock();
        let previous = std::mem::replace(&mut *lifecycle, Lifecycle::Stopping);
        drop(lifecycle);

        match previous {
            Lifecycle::Stopping => {
                debug!("Worker pool shutdown already in progress");
                false
            }
            Lifecycle::Idle(_) => {
                info!("Shutting down worker pool that was never started");
                self.close();
                self.stopped.fire();
                true
            }
            Lifecycle::Running => {
                info!(worker_count = self.config.worker_count, "Shutting down worker pool");
                self.close();
                true
            }
        }
    }

    /// The pool's "fully stopped" signal.
    #[must_use]
    pub fn stopped(&self) -> StoppedSignal {
        self.stopped.clone()
    }

    /// Whether shutdown has begun.
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// Pool configuration.
    #[must_use]
    pub const fn config(&self) -> &WorkerPoolConfig {
        &self.config
    }

    /// Get current pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot(
            self.config.worker_count,
            self.config.queue_capacity,
            self.queue_rx.len(),
        )
    }

    /// Stop lines first, then close the queue and discard what is left.
    fn close(&self) {
        self.shutting_down.store(true, Ordering::Release);

        for line in &self.stop_lines {
            line.signal();
        }

        self.queue_tx.write().take();

        let discarded = self.queue_rx.try_iter().count() as u64;
        if discarded > 0 {
            self.counters.discarded.fetch_add(discarded, Ordering::Relaxed);
            warn!(discarded, "Discarded queued jobs that no worker picked up");
        }
    }
}

impl<E: JobExecutor> JobSubmitter for WorkerPool<E> {
    fn submit(&self, job: Job) -> Result<JobId, SubmitError> {
        Self::submit(self, job)
    }

    fn stats(&self) -> PoolStats {
        Self::stats(self)
    }
}

impl<E: JobExecutor> Drop for WorkerPool<E> {
    fn drop(&mut self) {
        // Signal shutdown but DON'T join workers in Drop
        if self.shutdown() {
            debug!("WorkerPool dropped without explicit shutdown - workers will be detached");
        }
    }
}

/// Join one worker; a panicked worker is logged and counted as exited.
fn join_worker(worker_id: usize, handle: JoinHandle<()>) {
    if handle.join().is_err() {
        error!(worker_id, "Worker panicked");
    } else {
        debug!(worker_id, "Worker joined");
    }
}
