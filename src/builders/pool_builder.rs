//! Builders to construct worker pools from server configuration.

use crate::config::ServerConfig;
use crate::core::{JobExecutor, PoolError, SimulatedWork, WorkerPool};

/// Build the server's pool: `SimulatedWork` jobs of `cfg.job_duration`.
///
/// # Errors
///
/// Returns `PoolError::InvalidConfig` if the pool settings are invalid.
pub fn build_pool(cfg: &ServerConfig) -> Result<WorkerPool<SimulatedWork>, PoolError> {
    build_pool_with(cfg, SimulatedWork::new(cfg.job_duration))
}

/// Build a pool from server configuration with a caller-supplied executor.
///
/// # Errors
///
/// Returns `PoolError::InvalidConfig` if the pool settings are invalid.
pub fn build_pool_with<E>(cfg: &ServerConfig, executor: E) -> Result<WorkerPool<E>, PoolError>
where
    E: JobExecutor,
{
    WorkerPool::new(cfg.pool_config(), executor)
}
