//! Axum server: application state, router, and the listener loop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;

use zid_notify::Notifier;
use zid_store::{AnchorQueueStore, JobHistoryStore, TokenStore};
use zid_types::WorkflowParams;
use zid_verification::{LinkResolver, RecordService, RequestIssuer};

use crate::error::RpcError;
use crate::handlers;
use crate::metrics::RpcMetrics;

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppState<S, N> {
    pub issuer: RequestIssuer<S, N>,
    pub resolver: LinkResolver<S>,
    pub records: RecordService<S>,
    pub store: Arc<S>,
    pub metrics: RpcMetrics,
}

impl<S, N> AppState<S, N>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(
        store: Arc<S>,
        notifier: N,
        params: WorkflowParams,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            issuer: RequestIssuer::new(Arc::clone(&store), notifier, params, base_url),
            resolver: LinkResolver::new(Arc::clone(&store)),
            records: RecordService::new(Arc::clone(&store)),
            store,
            metrics: RpcMetrics::new(),
        }
    }
}

/// Build the full route table.
///
/// `/verify-employment/{tokenId}/{action}` is the public entry point the
/// emailed links hit; everything under `/api` serves the admin frontend.
pub fn router<S, N>(state: Arc<AppState<S, N>>) -> Router
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/verify-employment/:token_id/:action",
            get(handlers::resolve_link::<S, N>),
        )
        .route(
            "/api/job-histories",
            post(handlers::create_job_history::<S, N>),
        )
        .route(
            "/api/job-histories/:id",
            get(handlers::get_job_history::<S, N>)
                .delete(handlers::delete_job_history::<S, N>),
        )
        .route(
            "/api/job-histories/:id/verification-request",
            post(handlers::issue_verification::<S, N>),
        )
        .route(
            "/api/candidates/:candidate_id/job-histories",
            get(handlers::list_job_histories::<S, N>),
        )
        .route(
            "/api/anchor/telemetry",
            get(handlers::anchor_telemetry::<S, N>),
        )
        .route("/metrics", get(handlers::metrics::<S, N>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The HTTP listener.
pub struct RpcServer {
    bind_addr: SocketAddr,
}

impl RpcServer {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Serve until the shutdown signal fires.
    pub async fn serve<S, N>(
        &self,
        state: Arc<AppState<S, N>>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), RpcError>
    where
        S: JobHistoryStore + TokenStore + AnchorQueueStore + Send + Sync + 'static,
        N: Notifier + Send + Sync + 'static,
    {
        let app = router(state);
        let listener = tokio::net::TcpListener::bind(self.bind_addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.bind_addr)))?;

        tracing::info!("HTTP API listening on {}", self.bind_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
