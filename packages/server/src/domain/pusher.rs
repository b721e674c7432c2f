//! MessagePusher trait 定義
//!
//! ドメイン層が必要とする「接続へのメッセージ送信」のインターフェース。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::{notice::Notice, value_object::ConnectionId};

/// 接続ごとの送信チャンネル（エンコード済みのメッセージを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Failed to encode message: {0}")]
    EncodeFailed(String),
}

/// 接続へのメッセージ送信を抽象化する trait
///
/// 1つの接続への送信は呼び出し順に届く（FIFO）。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定の接続に送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        notice: &Notice,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に送信（一部の失敗は許容し、届いた数を返す）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notice: &Notice,
    ) -> Result<usize, MessagePushError>;

    /// トランスポートが開いている接続の一覧
    async fn open_connections(&self) -> HashSet<ConnectionId>;
}
