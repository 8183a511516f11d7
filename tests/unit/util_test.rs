//! Tests for utility functions and job identity

use lunar_dispatch::core::{Job, JobId, Payload};
use lunar_dispatch::util::{init_tracing, now_ms, now_nanos, now_secs, LOG_TIME_FORMAT};

#[test]
fn test_clocks_are_past_2020() {
    assert!(now_secs() > 1_577_836_800);
    assert!(now_ms() > 1_577_836_800_000);
    assert!(now_nanos() > 1_577_836_800_000_000_000);
}

#[test]
fn test_job_ids_are_numeric_and_increasing() {
    let a = JobId::generate();
    let b = JobId::generate();
    let a_n: u64 = a.as_str().parse().unwrap();
    let b_n: u64 = b.as_str().parse().unwrap();
    assert!(b_n > a_n);
}

#[test]
fn test_job_into_parts() {
    let mut payload = Payload::new();
    payload.insert("k".into(), serde_json::json!("v"));
    let job = Job::with_id(JobId::from("42"), payload.clone());

    let (id, body) = job.into_parts();
    assert_eq!(id.to_string(), "42");
    assert_eq!(body, payload);
}

#[test]
fn test_init_tracing_is_repeatable() {
    init_tracing(false);
    init_tracing(true);
    tracing::info!("tracing initialized twice without panicking");
    assert_eq!(LOG_TIME_FORMAT, "%H:%M:%S %m/%d/%Y");
}
