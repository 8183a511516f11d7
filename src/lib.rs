//! # Lunar Dispatch
//!
//! An in-memory job dispatcher: a bounded queue, a fixed pool of worker
//! threads and an HTTP front door with admission control.
//!
//! Jobs posted to `POST /process` are queued if there is room and rejected
//! with `429 Too Many Requests` when the queue is full. Submission never
//! blocks. Workers run on dedicated OS threads, each driving its own
//! single-threaded tokio runtime, so slow jobs never starve the HTTP server.
//!
//! ## Worker pool
//!
//! ```rust,ignore
//! use lunar_dispatch::config::WorkerPoolConfig;
//! use lunar_dispatch::core::{Job, Payload, SimulatedWork, WorkerPool};
//! use std::time::Duration;
//!
//! let pool = WorkerPool::new(
//!     WorkerPoolConfig::new()
//!         .with_worker_count(2)
//!         .with_queue_capacity(1000),
//!     SimulatedWork::new(Duration::from_secs(1)),
//! )?;
//! pool.start()?;
//!
//! let id = pool.submit(Job::new(Payload::new()))?;
//!
//! // Stop accepting work and wait for every worker to exit.
//! pool.shutdown();
//! pool.stopped().wait();
//! ```
//!
//! ## Server
//!
//! ```rust,ignore
//! let config = lunar_dispatch::config::ServerConfig::from_env()?;
//! lunar_dispatch::runtime::run(config).await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core dispatch abstractions: jobs, executors and the worker pool.
pub mod core;
/// Configuration for the pool and the server.
pub mod config;
/// Builders to construct dispatch components from configuration.
pub mod builders;
/// HTTP surface and server loop.
pub mod runtime;
/// Shared utilities.
pub mod util;
