//! Dispatch server configuration loaded from the environment.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use super::pool::{WorkerPoolConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_THREAD_STACK_SIZE};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 6002;
const DEFAULT_WORKER_COUNT: usize = 2;
const DEFAULT_JOB_DURATION_MS: u64 = 1000;
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} must be set in the environment")]
    Missing(&'static str),
    /// A variable is set but does not parse.
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// Values parse but are inconsistent.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// HMAC secret used to sign bearer tokens. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret bytes, for signing.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Server configuration, built once at process start and passed to every
/// component that needs it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `6002`).
    pub port: u16,
    /// Worker thread count (default: `2`).
    pub worker_count: usize,
    /// Shared queue capacity (default: `1000`).
    pub queue_capacity: usize,
    /// Worker thread stack size in bytes.
    pub worker_stack_size: usize,
    /// Simulated duration of one job (default: 1 s).
    pub job_duration: Duration,
    /// Lifetime of issued bearer tokens (default: 24 h).
    pub token_ttl: Duration,
    /// How long to wait for workers to stop on shutdown (default: 30 s).
    pub shutdown_timeout: Duration,
    /// Colored log output (default: `true`).
    pub log_color: bool,
    /// Token signing secret.
    pub secret_key: SecretKey,
}

impl ServerConfig {
    /// Load configuration from process environment variables.
    ///
    /// | Env Var                 | Required | Default   |
    /// |-------------------------|----------|-----------|
    /// | `SECRET_KEY`            | **yes**  | --        |
    /// | `HOST`                  | no       | `0.0.0.0` |
    /// | `PORT`                  | no       | `6002`    |
    /// | `WORKER_COUNT`          | no       | `2`       |
    /// | `JOB_QUEUE_SIZE`        | no       | `1000`    |
    /// | `WORKER_STACK_SIZE`     | no       | `2097152` |
    /// | `JOB_DURATION_MS`       | no       | `1000`    |
    /// | `TOKEN_TTL_SECS`        | no       | `86400`   |
    /// | `SHUTDOWN_TIMEOUT_SECS` | no       | `30`      |
    /// | `LOG_COLOR`             | no       | `true`    |
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `SECRET_KEY` is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("SECRET_KEY")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let config = Self {
            host: lookup("HOST")
                .map(|h| h.trim().to_owned())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.into()),
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            worker_count: parse_var(&lookup, "WORKER_COUNT", DEFAULT_WORKER_COUNT)?,
            queue_capacity: parse_var(&lookup, "JOB_QUEUE_SIZE", DEFAULT_QUEUE_CAPACITY)?,
            worker_stack_size: parse_var(&lookup, "WORKER_STACK_SIZE", DEFAULT_THREAD_STACK_SIZE)?,
            job_duration: Duration::from_millis(parse_var(
                &lookup,
                "JOB_DURATION_MS",
                DEFAULT_JOB_DURATION_MS,
            )?),
            token_ttl: Duration::from_secs(parse_var(
                &lookup,
                "TOKEN_TTL_SECS",
                DEFAULT_TOKEN_TTL_SECS,
            )?),
            shutdown_timeout: Duration::from_secs(parse_var(
                &lookup,
                "SHUTDOWN_TIMEOUT_SECS",
                DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            )?),
            log_color: parse_var(&lookup, "LOG_COLOR", true)?,
            secret_key: SecretKey::new(secret),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` on the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pool_config()
            .validate()
            .map_err(ConfigError::Validation)?;
        if self.token_ttl.is_zero() {
            return Err(ConfigError::Validation("TOKEN_TTL_SECS must be greater than 0".into()));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// Worker pool settings derived from this configuration.
    #[must_use]
    pub const fn pool_config(&self) -> WorkerPoolConfig {
        WorkerPoolConfig {
            worker_count: self.worker_count,
            queue_capacity: self.queue_capacity,
            thread_stack_size: self.worker_stack_size,
        }
    }

    /// Address to bind the HTTP listener to.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `HOST` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = self.host.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: "HOST",
            value: self.host.clone(),
            reason: e.to_string(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw,
            reason: e.to_string(),
        }),
    }
}
