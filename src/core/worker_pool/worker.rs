//! A single worker: one OS thread draining the shared queue until stopped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Select, Sender, TryRecvError};
use tracing::{debug, error, info};

use crate::core::executor::JobExecutor;
use crate::core::job::Job;

use super::PoolCounters;

/// Pool-side end of a worker's private stop line.
#[derive(Debug)]
pub(super) struct StopLine {
    worker_id: usize,
    tx: Sender<()>,
}

impl StopLine {
    /// Tell the worker to stop. The line holds one signal, so this never
    /// blocks; a second signal on a line that was not yet drained is dropped.
    pub(super) fn signal(&self) {
        if self.tx.try_send(()).is_err() {
            debug!(worker_id = self.worker_id, "Stop line already signalled or closed");
        }
    }
}

/// A worker that has been created but not started.
#[derive(Debug)]
pub(super) struct Worker {
    id: usize,
    stop: Receiver<()>,
}

impl Worker {
    /// Create worker `id` together with the pool's end of its stop line.
    pub(super) fn new(id: usize) -> (Self, StopLine) {
        let (tx, rx) = bounded(1);
        (Self { id, stop: rx }, StopLine { worker_id: id, tx })
    }

    pub(super) const fn id(&self) -> usize {
        self.id
    }

    /// Spawn the worker's thread and run its loop there.
    pub(super) fn start<E: JobExecutor>(
        self,
        jobs: Receiver<Job>,
        executor: E,
        counters: Arc<PoolCounters>,
        stack_size: usize,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(thread_name(self.id))
            .stack_size(stack_size)
            .spawn(move || self.run(&jobs, &executor, &counters))
    }

    fn run<E: JobExecutor>(self, jobs: &Receiver<Job>, executor: &E, counters: &PoolCounters) {
        let worker_id = self.id;
        debug!(worker_id, "Worker thread started");

        // Each worker has its own single-threaded tokio runtime
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!(worker_id, error = %e, "Failed to create worker runtime");
                return;
            }
        };

        // Blocking wait over both sources; the Select is reused every loop.
        let mut sel = Select::new();
        let stop_op = sel.recv(&self.stop);
        sel.recv(jobs);

        loop {
            // A stop that arrived during the last job wins over queued work.
            match self.stop.try_recv() {
                Err(TryRecvError::Empty) => {}
                Ok(()) | Err(TryRecvError::Disconnected) => break,
            }

            let oper = sel.select();
            if oper.index() == stop_op {
                let _ = oper.recv(&self.stop);
                break;
            }
            // Only two operations are registered; anything else is the queue.
            let Ok(job) = oper.recv(jobs) else {
                debug!(worker_id, "Job queue closed");
                break;
            };

            let active = ActiveJob::begin(&counters.active);
            info!(
                worker_id,
                job_id = %job.id(),
                payload = ?job.payload(),
                "Worker {worker_id} processing job ID {}",
                job.id()
            );

            let job_id = job.id().clone();
            rt.block_on(executor.execute(worker_id, job));

            drop(active);
            info!(worker_id, job_id = %job_id, "Worker {worker_id} completed job ID {job_id}");
            counters.completed.fetch_add(1, Ordering::Relaxed);
        }

        info!(worker_id, "Worker {worker_id} shutting down...");
    }
}

/// Counts one executing job for as long as it lives, including when the
/// executor unwinds.
struct ActiveJob<'a>(&'a AtomicU64);

impl<'a> ActiveJob<'a> {
    fn begin(active: &'a AtomicU64) -> Self {
        active.fetch_add(1, Ordering::Relaxed);
        Self(active)
    }
}

impl Drop for ActiveJob<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

pub(super) fn thread_name(worker_id: usize) -> String {
    format!("dispatch-worker-{worker_id}")
}
