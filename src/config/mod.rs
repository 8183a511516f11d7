//! Configuration models for the worker pool and the dispatch server.

pub mod pool;
pub mod server;

pub use pool::WorkerPoolConfig;
pub use server::{ConfigError, SecretKey, ServerConfig};
