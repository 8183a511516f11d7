//! Tests for error types and their HTTP mapping

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use lunar_dispatch::core::{Job, Payload, PoolError, SubmitError};
use lunar_dispatch::runtime::ApiError;

async fn error_to_response(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_pool_error_display() {
    let err = PoolError::InvalidConfig("worker_count must be greater than 0".into());
    assert_eq!(
        format!("{err}"),
        "invalid configuration: worker_count must be greater than 0"
    );
    assert_eq!(format!("{}", PoolError::AlreadyStarted), "worker pool already started");
}

#[test]
fn test_spawn_error_keeps_source() {
    use std::error::Error as _;

    let err = PoolError::Spawn {
        name: "dispatch-worker-1".into(),
        source: std::io::Error::other("no threads left"),
    };
    assert!(format!("{err}").starts_with("failed to spawn dispatch-worker-1"));
    assert!(err.source().is_some());
}

#[tokio::test]
async fn test_queue_full_maps_to_429() {
    let err = ApiError::from(SubmitError::QueueFull(Job::new(Payload::new())));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["code"], "SERVER_BUSY");
}

#[tokio::test]
async fn test_shutting_down_maps_to_503() {
    let err = ApiError::from(SubmitError::ShuttingDown(Job::new(Payload::new())));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "SHUTTING_DOWN");
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let (status, json) = error_to_response(ApiError::Internal("key material".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "Internal Server Error");
}

#[tokio::test]
async fn test_client_errors() {
    let (status, json) = error_to_response(ApiError::InvalidPayload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid payload");

    let (status, json) = error_to_response(ApiError::MethodNotAllowed).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["code"], "METHOD_NOT_ALLOWED");
}
