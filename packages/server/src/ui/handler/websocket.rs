//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ConnectionId, Demo, ScreenNumber, Selection},
    infrastructure::dto::websocket::{ClientMessage, PresetDto},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Messages queued for this connection are written in order. When `shutdown`
/// is cancelled a Close frame is sent and the task ends.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                _ = shutdown.cancelled() => {
                    let frame = CloseFrame {
                        code: close_code::AWAY,
                        reason: "server shutting down".into(),
                    };
                    if let Err(e) = sender.send(Message::Close(Some(frame))).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // connected は pusher_loop が最初に書き出す
    let client_id = state.connect_usecase.execute(tx).await;
    tracing::info!("Client '{}' connected", client_id);

    let mut send_task = pusher_loop(rx, sender, state.shutdown.clone());

    let recv_state = state.clone();
    let recv_client_id = client_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_client_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    recv_state.liveness_usecase.touch(&recv_client_id).await;
                    dispatch(&recv_state, &recv_client_id, text.as_str()).await;
                }
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong frames are answered by the WebSocket protocol
                    recv_state.liveness_usecase.touch(&recv_client_id).await;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_client_id);
                    break;
                }
                Message::Binary(_) => {
                    tracing::warn!("Ignoring binary frame from '{}'", recv_client_id);
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let retracted = state.disconnect_usecase.execute(&client_id).await;
    tracing::info!(
        "Client '{}' disconnected (screen: {:?}, was seed: {})",
        client_id,
        retracted.screen.map(|screen| screen.value()),
        retracted.released_seed
    );
}

/// Route one inbound text message. Malformed input is logged and dropped;
/// the connection stays open.
async fn dispatch(state: &AppState, client_id: &ConnectionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Dropping malformed message from '{}': {}", client_id, e);
            return;
        }
    };

    match message {
        ClientMessage::SetMode {
            mode,
            screen_number,
            secret,
        } => {
            let screen = screen_number.and_then(|value| match ScreenNumber::new(value) {
                Ok(screen) => Some(screen),
                Err(e) => {
                    tracing::warn!("Ignoring screen number in setMode from '{}': {}", client_id, e);
                    None
                }
            });
            if let Err(e) = state
                .set_mode_usecase
                .execute(client_id, mode, screen, secret.as_deref())
                .await
            {
                tracing::warn!("setMode from '{}' rejected: {}", client_id, e);
            }
        }
        ClientMessage::RegisterScreen { screen_number } => {
            if let Err(e) = state
                .register_screen_usecase
                .execute(client_id, screen_number)
                .await
            {
                tracing::warn!("registerScreen from '{}' rejected: {}", client_id, e);
            }
        }
        ClientMessage::SelectPreset { preset, demos } => {
            let selection = match Selection::try_from(PresetDto {
                name: preset,
                demos,
            }) {
                Ok(selection) => selection,
                Err(e) => {
                    tracing::warn!("Dropping malformed selectPreset from '{}': {}", client_id, e);
                    return;
                }
            };
            if let Err(e) = state
                .select_preset_usecase
                .execute(client_id, selection)
                .await
            {
                tracing::warn!("selectPreset from '{}' rejected: {}", client_id, e);
            }
        }
        ClientMessage::SendIndividualDemo { screen_number, demo } => {
            let Ok(screen) = ScreenNumber::new(screen_number) else {
                tracing::info!("No screen {} to send a demo to", screen_number);
                return;
            };
            let demo = match Demo::try_from(demo) {
                Ok(demo) => demo,
                Err(e) => {
                    tracing::warn!(
                        "Dropping malformed sendIndividualDemo from '{}': {}",
                        client_id,
                        e
                    );
                    return;
                }
            };
            if let Err(e) = state
                .send_demo_usecase
                .execute(client_id, screen, demo)
                .await
            {
                tracing::warn!("sendIndividualDemo from '{}' rejected: {}", client_id, e);
            }
        }
        ClientMessage::Ping => {
            if let Err(e) = state.liveness_usecase.reply_pong(client_id).await {
                tracing::warn!("Failed to answer ping from '{}': {}", client_id, e);
            }
        }
        ClientMessage::Pong => {
            tracing::debug!("Heartbeat acknowledged by '{}'", client_id);
        }
    }
}
