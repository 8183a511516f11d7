//! Tests for configuration loading and validation

use std::collections::HashMap;
use std::time::Duration;

use lunar_dispatch::config::{ConfigError, ServerConfig, WorkerPoolConfig};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |var| map.get(var).cloned()
}

#[test]
fn test_server_config_defaults() {
    let cfg = ServerConfig::from_lookup(lookup(&[("SECRET_KEY", "s3cret")])).unwrap();

    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 6002);
    assert_eq!(cfg.worker_count, 2);
    assert_eq!(cfg.queue_capacity, 1000);
    assert_eq!(cfg.worker_stack_size, 2 * 1024 * 1024);
    assert_eq!(cfg.job_duration, Duration::from_secs(1));
    assert_eq!(cfg.token_ttl, Duration::from_secs(86_400));
    assert_eq!(cfg.shutdown_timeout, Duration::from_secs(30));
    assert!(cfg.log_color);
    assert_eq!(cfg.secret_key.expose(), b"s3cret");
    assert_eq!(cfg.socket_addr().unwrap().to_string(), "0.0.0.0:6002");
}

#[test]
fn test_server_config_overrides() {
    let cfg = ServerConfig::from_lookup(lookup(&[
        ("SECRET_KEY", "k"),
        ("HOST", "127.0.0.1"),
        ("PORT", "8080"),
        ("WORKER_COUNT", "8"),
        ("JOB_QUEUE_SIZE", "5"),
        ("JOB_DURATION_MS", "250"),
        ("TOKEN_TTL_SECS", "60"),
        ("SHUTDOWN_TIMEOUT_SECS", "3"),
        ("LOG_COLOR", "false"),
    ]))
    .unwrap();

    assert_eq!(cfg.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.worker_count, 8);
    assert_eq!(cfg.queue_capacity, 5);
    assert_eq!(cfg.job_duration, Duration::from_millis(250));
    assert_eq!(cfg.token_ttl, Duration::from_secs(60));
    assert_eq!(cfg.shutdown_timeout, Duration::from_secs(3));
    assert!(!cfg.log_color);

    let pool = cfg.pool_config();
    assert_eq!(pool.worker_count, 8);
    assert_eq!(pool.queue_capacity, 5);
}

#[test]
fn test_missing_secret_key_is_an_error() {
    let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("SECRET_KEY")));

    let err = ServerConfig::from_lookup(lookup(&[("SECRET_KEY", "")])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("SECRET_KEY")));
}

#[test]
fn test_unparsable_value_names_the_variable() {
    let err = ServerConfig::from_lookup(lookup(&[("SECRET_KEY", "k"), ("PORT", "http")]))
        .unwrap_err();
    match err {
        ConfigError::Invalid { var, value, .. } => {
            assert_eq!(var, "PORT");
            assert_eq!(value, "http");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_zero_workers_fails_validation() {
    let err = ServerConfig::from_lookup(lookup(&[("SECRET_KEY", "k"), ("WORKER_COUNT", "0")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_zero_token_ttl_fails_validation() {
    let err = ServerConfig::from_lookup(lookup(&[("SECRET_KEY", "k"), ("TOKEN_TTL_SECS", "0")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_bad_host_is_rejected() {
    let err = ServerConfig::from_lookup(lookup(&[("SECRET_KEY", "k"), ("HOST", "not a host")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "HOST", .. }));
}

#[test]
fn test_secret_is_not_printed() {
    let cfg = ServerConfig::from_lookup(lookup(&[("SECRET_KEY", "do-not-log")])).unwrap();
    assert!(!format!("{cfg:?}").contains("do-not-log"));
}

#[test]
fn test_pool_config_from_json() {
    let cfg = WorkerPoolConfig::from_json_str(r#"{"worker_count": 3, "queue_capacity": 7}"#)
        .unwrap();
    assert_eq!(cfg.worker_count, 3);
    assert_eq!(cfg.queue_capacity, 7);
    assert_eq!(cfg.thread_stack_size, 2 * 1024 * 1024);
}

#[test]
fn test_pool_config_from_json_validates() {
    let err = WorkerPoolConfig::from_json_str(r#"{"worker_count": 0}"#).unwrap_err();
    assert!(err.contains("worker_count"));

    let err = WorkerPoolConfig::from_json_str("{").unwrap_err();
    assert!(err.starts_with("parse error"));
}
