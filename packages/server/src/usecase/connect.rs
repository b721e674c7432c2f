//! UseCase: 接続と切断
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectUseCase::execute(): 接続の登録と connected メッセージ
//! - DisconnectUseCase::execute(): Registry / Screen Directory / Seed Arbitrator からの撤去
//!
//! ### なぜこのテストが必要か
//! - connected が必ず最初のメッセージであることを保証する
//! - 切断時の撤去が冪等で、seed にトポロジーが通知されることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続、既存の選択がある状態での接続、切断
//! - エッジケース：同じ接続を2回切断する

use std::sync::Arc;

use seedwall_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, Notice, PusherChannel, Retracted, Timestamp};

use super::{SharedHub, topology::notify_seed};

/// 接続のユースケース
pub struct ConnectUseCase {
    hub: SharedHub,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectUseCase {
    pub fn new(
        hub: SharedHub,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            hub,
            message_pusher,
            clock,
        }
    }

    /// 新しい接続を peer として登録し、connected を送る
    ///
    /// # Arguments
    ///
    /// * `sender` - この接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 新しく発行した接続 ID
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let mut hub = self.hub.lock().await;

        // 1. Registry に登録
        let id = hub.admit(Timestamp::new(self.clock.now_millis()));

        // 2. MessagePusher に送信チャンネルを登録
        self.message_pusher.register_client(id.clone(), sender).await;

        // 3. connected を最初のメッセージとして送る
        let welcome = Notice::Connected {
            client_id: id.clone(),
            current_preset: hub.current_selection().cloned(),
            counts: hub.counts(),
        };
        if let Err(e) = self.message_pusher.push_to(&id, &welcome).await {
            tracing::warn!("Failed to send connected to '{}': {}", id, e);
        }

        // 4. seed にトポロジーを通知
        notify_seed(&hub, self.message_pusher.as_ref()).await;

        id
    }
}

/// 切断のユースケース
pub struct DisconnectUseCase {
    hub: SharedHub,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUseCase {
    pub fn new(hub: SharedHub, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            hub,
            message_pusher,
        }
    }

    /// 接続の痕跡をすべて撤去する。何度呼んでも安全。
    pub async fn execute(&self, id: &ConnectionId) -> Retracted {
        let mut hub = self.hub.lock().await;
        let retracted = hub.retract(id);
        self.message_pusher.unregister_client(id).await;

        if retracted.is_noop() {
            tracing::debug!("Connection '{}' was already retracted", id);
            return retracted;
        }

        if let Some(screen) = retracted.screen {
            tracing::info!("Connection '{}' left screen {}", id, screen);
        }
        if retracted.released_seed {
            tracing::info!("Seed '{}' disconnected, seed slot is empty", id);
        }
        notify_seed(&hub, self.message_pusher.as_ref()).await;

        retracted
    }
}
