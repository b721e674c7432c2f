//! Dependency wiring.

use std::sync::Arc;

use seedwall_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    config::ServerConfig,
    domain::{CatalogRepository, Hub, MessagePusher},
    error::ServerError,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::FileCatalogRepository},
    ui::{AppState, Server},
    usecase::{
        CatalogUseCase, ConnectUseCase, DisconnectUseCase, GetTopologyUseCase, LivenessUseCase,
        RegisterScreenUseCase, SelectPresetUseCase, SendDemoUseCase, SetModeUseCase, SharedHub,
    },
};

/// Build a ready-to-run server from `config`.
///
/// # Errors
///
/// Fails if the configuration is invalid or the catalog file cannot be read.
pub async fn build_server(config: &ServerConfig) -> Result<Server, ServerError> {
    config.validate()?;

    // Initialize dependencies in order:
    // 1. Hub (shared state)
    // 2. Repository
    // 3. MessagePusher
    // 4. UseCases
    // 5. Server

    // 1. Create the Hub
    let hub: SharedHub = Arc::new(Mutex::new(Hub::new()));

    // 2. Open the catalog
    let repository: Arc<dyn CatalogRepository> =
        Arc::new(FileCatalogRepository::open(&config.catalog_path).await?);
    tracing::info!("Catalog loaded from {}", config.catalog_path.display());

    // 3. Create MessagePusher (WebSocket implementation)
    let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if config.seed_secret.is_some() {
        tracing::info!("Seed role is protected by a shared secret");
    }

    // 4. Create UseCases
    let state = AppState {
        connect_usecase: Arc::new(ConnectUseCase::new(
            hub.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        disconnect_usecase: Arc::new(DisconnectUseCase::new(hub.clone(), message_pusher.clone())),
        set_mode_usecase: Arc::new(SetModeUseCase::new(
            hub.clone(),
            message_pusher.clone(),
            config.seed_secret.clone(),
        )),
        register_screen_usecase: Arc::new(RegisterScreenUseCase::new(
            hub.clone(),
            message_pusher.clone(),
        )),
        select_preset_usecase: Arc::new(SelectPresetUseCase::new(
            hub.clone(),
            message_pusher.clone(),
        )),
        send_demo_usecase: Arc::new(SendDemoUseCase::new(hub.clone(), message_pusher.clone())),
        liveness_usecase: Arc::new(LivenessUseCase::new(
            hub.clone(),
            message_pusher.clone(),
            clock,
        )),
        catalog_usecase: Arc::new(CatalogUseCase::new(
            repository,
            hub.clone(),
            message_pusher.clone(),
        )),
        get_topology_usecase: Arc::new(GetTopologyUseCase::new(hub, message_pusher)),
        shutdown: CancellationToken::new(),
    };

    // 5. Create the server
    Ok(Server::new(state, config.heartbeat_interval()))
}
