//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::{error::ServerError, tasks::start_heartbeat};

use super::{
    handler::{get_presets, get_topology, health_check, post_presets, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Seedwall server
///
/// Serves the WebSocket endpoint and the REST routes, and runs the heartbeat
/// task until shutdown.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, Duration::from_secs(30));
/// server.run("127.0.0.1", 3000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    heartbeat_interval: Duration,
}

impl Server {
    pub fn new(state: AppState, heartbeat_interval: Duration) -> Self {
        Self {
            state: Arc::new(state),
            heartbeat_interval,
        }
    }

    /// Token that stops the server when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.state.shutdown.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/presets", get(get_presets).post(post_presets))
            .route("/api/topology", get(get_topology))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind `host:port` and serve until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        self.serve(listener).await
    }

    /// Serve on an already bound listener until shutdown
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        let token = self.shutdown_token();

        tracing::info!(
            "Seedwall server listening on {}",
            listener.local_addr().map_err(ServerError::Serve)?
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let heartbeat = tokio::spawn(start_heartbeat(
            self.state.liveness_usecase.clone(),
            self.heartbeat_interval,
            token.clone(),
        ));

        // Set up graceful shutdown signal handler
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(token.clone()))
            .await
            .map_err(ServerError::Serve);

        token.cancel();
        if let Err(e) = heartbeat.await {
            tracing::warn!("Heartbeat task ended abnormally: {}", e);
        }

        tracing::info!("Server shutdown complete");
        result
    }
}
