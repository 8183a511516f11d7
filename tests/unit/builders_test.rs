//! Tests for builder modules

use std::time::Duration;

use lunar_dispatch::builders::{build_pool, build_pool_with};
use lunar_dispatch::config::ServerConfig;
use lunar_dispatch::core::{Job, Payload, SimulatedWork};

fn server_config(workers: &str, queue: &str) -> ServerConfig {
    let workers = workers.to_string();
    let queue = queue.to_string();
    ServerConfig::from_lookup(move |var| match var {
        "SECRET_KEY" => Some("k".into()),
        "WORKER_COUNT" => Some(workers.clone()),
        "JOB_QUEUE_SIZE" => Some(queue.clone()),
        "JOB_DURATION_MS" => Some("5".into()),
        _ => None,
    })
    .unwrap()
}

#[test]
fn test_build_pool_uses_server_settings() {
    let pool = build_pool(&server_config("3", "12")).unwrap();
    assert_eq!(pool.config().worker_count, 3);
    assert_eq!(pool.config().queue_capacity, 12);

    let stats = pool.stats();
    assert_eq!(stats.worker_count, 3);
    assert_eq!(stats.queue_capacity, 12);
}

#[test]
fn test_built_pool_runs_jobs() {
    let pool = build_pool(&server_config("1", "4")).unwrap();
    pool.start().unwrap();
    pool.submit(Job::new(Payload::new())).unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while pool.stats().completed_jobs < 1 && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(pool.stats().completed_jobs, 1);

    pool.shutdown();
    assert!(pool.stopped().wait_for(Duration::from_secs(5)));
}

#[test]
fn test_build_pool_with_custom_executor() {
    let pool = build_pool_with(&server_config("2", "0"), SimulatedWork::new(Duration::ZERO))
        .unwrap();
    assert_eq!(pool.config().queue_capacity, 0);
}
