//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `Notice` を JSON にエンコードしてクライアントへ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の受付と sender の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! sender の先では接続ごとの pusher タスクが 1 本だけソケットに書き込むため、
//! 同じ接続へのメッセージは送信順に届きます。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, Notice, PusherChannel},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(client_id.clone(), tx).await;
/// pusher.push_to(&client_id, &Notice::Ping).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(notice: &Notice) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(notice))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
        clients.insert(client_id, sender);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        notice: &Notice,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(notice)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(client_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(client_id.to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::trace!("Pushed message to client '{}'", client_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notice: &Notice,
    ) -> Result<usize, MessagePushError> {
        let content = Self::encode(notice)?;
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for target in targets {
            match clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => match sender.send(content.clone()) {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        tracing::warn!("Failed to push message to client '{}': {}", target, e)
                    }
                },
                None => {
                    tracing::warn!("Client '{}' not found during broadcast, skipping", target)
                }
            }
        }

        Ok(delivered)
    }

    async fn open_connections(&self) -> HashSet<ConnectionId> {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .filter(|(_, sender)| !sender.is_closed())
            .map(|(id, _)| id.clone())
            .collect()
    }
}
