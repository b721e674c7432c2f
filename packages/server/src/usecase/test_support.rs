//! UseCase テスト用のヘルパー

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ConnectionId, Hub, MessagePusher, Timestamp},
    infrastructure::message_pusher::WebSocketMessagePusher,
};

use super::SharedHub;

pub(crate) fn shared_hub() -> SharedHub {
    Arc::new(Mutex::new(Hub::new()))
}

pub(crate) fn test_message_pusher() -> Arc<WebSocketMessagePusher> {
    Arc::new(WebSocketMessagePusher::new())
}

/// 接続を登録し、その接続宛ての受信側を返す
pub(crate) async fn attach(
    hub: &SharedHub,
    message_pusher: &Arc<WebSocketMessagePusher>,
) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = hub.lock().await.admit(Timestamp::new(0));
    message_pusher.register_client(id.clone(), tx).await;
    (id, rx)
}

/// 受信済みのメッセージをすべて JSON として取り出す
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
    let mut messages = Vec::new();
    while let Ok(text) = rx.try_recv() {
        messages.push(serde_json::from_str(&text).unwrap());
    }
    messages
}
