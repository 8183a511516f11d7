//! State shared by every handler.

use std::sync::Arc;

use crate::core::JobSubmitter;

use super::token::TokenIssuer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Submission boundary of the worker pool.
    pub submitter: Arc<dyn JobSubmitter>,
    /// Bearer token issuer.
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Bundle the pool and token issuer for the router.
    #[must_use]
    pub fn new(submitter: Arc<dyn JobSubmitter>, tokens: TokenIssuer) -> Self {
        Self {
            submitter,
            tokens: Arc::new(tokens),
        }
    }
}
