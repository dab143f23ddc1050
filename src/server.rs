//! HTTP server for the dashboard API.
//!
//! Endpoints:
//! - `GET /`                                   liveness probe
//! - `GET /api/workspace/:wsid`                workspace summary
//! - `GET /api/workspace/:wsid/runs`           paginated runs
//! - `GET /api/workspace/:wsid/steps`          paginated steps
//! - `GET /api/workspace/:wsid/run/:rid`       run detail with ordered steps
//! - `GET /api/workspace/:wsid/step/:sid`      step detail with its runs
//! - `GET /api/workspace/:wsid/artifact/:aid`  artifact metadata

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::routes::{
    get_artifact, get_run, get_step, get_workspace, index, list_runs, list_steps,
};
use crate::api::ApiState;
use crate::config::ServerConfig;
use crate::workspace::{SnapshotOpener, WorkspaceOpener};

/// Build the API router over shared state.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/workspace/:wsid", get(get_workspace))
        .route("/api/workspace/:wsid/runs", get(list_runs))
        .route("/api/workspace/:wsid/steps", get(list_steps))
        .route("/api/workspace/:wsid/run/:rid", get(get_run))
        .route("/api/workspace/:wsid/step/:sid", get(get_step))
        .route("/api/workspace/:wsid/artifact/:aid", get(get_artifact))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub struct VizServer {
    config: ServerConfig,
    state: Arc<ApiState>,
}

impl VizServer {
    pub fn new(config: ServerConfig, opener: Arc<dyn WorkspaceOpener>) -> Self {
        let state = Arc::new(ApiState::new(opener, config.cache_capacity));
        Self { config, state }
    }

    /// Server reading workspace snapshots from `config.workspace_root`.
    pub fn from_config(config: ServerConfig) -> Self {
        let opener = Arc::new(SnapshotOpener::new(config.workspace_root.clone()));
        Self::new(config, opener)
    }

    pub fn state(&self) -> Arc<ApiState> {
        self.state.clone()
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind to the configured address and serve until Ctrl-C.
    pub async fn start(&self) -> anyhow::Result<()> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr).await?;

        info!(
            addr = %addr,
            workspace_root = %self.config.workspace_root.display(),
            cache_capacity = self.config.cache_capacity,
            "Workspace API listening"
        );

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Workspace API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
