//! Dispatch endpoint handlers and their request/response models.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::core::{Job, JobId, Payload, PoolStats, SubmitError};

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Response for an accepted `POST /process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedResponse {
    /// Always `"queued"`.
    pub status: String,
    /// Id of the queued job.
    #[serde(rename = "jobId")]
    pub job_id: JobId,
}

impl QueuedResponse {
    fn queued(job_id: JobId) -> Self {
        Self {
            status: "queued".to_owned(),
            job_id,
        }
    }
}

/// Response for `POST /token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed bearer token.
    pub token: String,
    /// Human-readable outcome.
    pub message: String,
}

/// Health response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// POST /process
///
/// Wraps the JSON object body in a [`Job`] and offers it to the pool.
/// 200 when queued, 429 when the queue is full, 503 once shutdown began.
///
/// # Errors
///
/// See [`ApiError`] for the status of each failure.
pub async fn process_job(
    State(state): State<AppState>,
    body: Result<Json<Payload>, JsonRejection>,
) -> ApiResult<Json<QueuedResponse>> {
    let Json(payload) = body.map_err(|rejection| {
        error!(%rejection, "Invalid payload posted to /process");
        ApiError::InvalidPayload
    })?;

    match state.submitter.submit(Job::new(payload)) {
        Ok(job_id) => {
            info!(job_id = %job_id, "Job ID {job_id} has been queued successfully");
            Ok(Json(QueuedResponse::queued(job_id)))
        }
        Err(err) => {
            match &err {
                SubmitError::QueueFull(job) => {
                    warn!(job_id = %job.id(), "Server is currently busy, try again later");
                }
                SubmitError::ShuttingDown(job) => {
                    warn!(job_id = %job.id(), "Rejected job submitted during shutdown");
                }
            }
            Err(err.into())
        }
    }
}

/// POST /token
///
/// Issues a bearer token whose `hash` claim fingerprints the JSON body.
///
/// # Errors
///
/// 400 on a malformed body, 500 if signing fails.
pub async fn issue_token(
    State(state): State<AppState>,
    body: Result<Json<Payload>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(payload) = body.map_err(|rejection| {
        error!(%rejection, "Failed to parse request body");
        ApiError::InvalidPayload
    })?;

    info!("Received Request [Bearer Token Generator]");
    let token = state
        .tokens
        .issue(&payload)
        .map_err(|e| ApiError::Internal(format!("Failed to sign JWT token: {e}")))?;
    info!("Authorization Bearer Token Generated");

    Ok(Json(TokenResponse {
        token,
        message: "Successful Validation".to_owned(),
    }))
}

/// GET /health
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

/// GET /stats
pub async fn pool_stats(State(state): State<AppState>) -> Json<PoolStats> {
    Json(state.submitter.stats())
}

/// Any other method on a known route.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    error!(%method, path = %uri.path(), "Invalid method attempted");
    ApiError::MethodNotAllowed
}
