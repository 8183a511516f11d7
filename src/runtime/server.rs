//! HTTP server wiring: router, listener and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

use crate::builders::build_pool;
use crate::config::ServerConfig;
use crate::core::{AppResult, JobExecutor, JobSubmitter, StoppedSignal, WorkerPool};

use super::api::{health, issue_token, method_not_allowed, pool_stats, process_job};
use super::state::AppState;
use super::token::TokenIssuer;

/// Build the dispatch router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/process", post(process_job).fallback(method_not_allowed))
        .route("/token", post(issue_token).fallback(method_not_allowed))
        .route("/health", get(health))
        .route("/stats", get(pool_stats))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Start the worker pool, serve HTTP until a termination signal arrives,
/// then wait (bounded by `shutdown_timeout`) for the workers to stop.
///
/// # Errors
///
/// Fails if the pool cannot start, the listener cannot bind, or serving fails.
pub async fn run(config: ServerConfig) -> AppResult<()> {
    let addr = config.socket_addr()?;
    let pool = Arc::new(build_pool(&config)?);
    pool.start()?;

    let submitter: Arc<dyn JobSubmitter> = pool.clone();
    let state = AppState::new(submitter, TokenIssuer::from_config(&config));

    info!("Starting Lunar dispatch server on port {}", config.port);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            pool.shutdown();
            return Err(e).with_context(|| format!("failed to bind {addr}"));
        }
    };
    info!(%addr, workers = config.worker_count, queue = config.queue_capacity, "Lunar dispatch server is up and running");

    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&pool)))
        .await;

    // No-op when the signal handler already did it.
    pool.shutdown();
    wait_for_workers(&pool.stopped(), config.shutdown_timeout).await;

    served.context("http server failed")?;
    info!("Lunar dispatch server stopped");
    Ok(())
}

async fn wait_for_workers(stopped: &StoppedSignal, timeout: Duration) {
    match tokio::time::timeout(timeout, stopped.wait_async()).await {
        Ok(Ok(())) => info!("All workers have stopped"),
        Ok(Err(e)) => error!(error = %e, "Failed waiting for workers"),
        Err(_) => warn!(?timeout, "Workers did not stop before the shutdown timeout"),
    }
}

async fn shutdown_signal<E: JobExecutor>(pool: Arc<WorkerPool<E>>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT (Ctrl-C), starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }

    warn!("Shutting down dispatch server...");
    pool.shutdown();
}
