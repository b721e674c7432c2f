//! UseCase: 死活確認
//!
//! クライアントからの受信はすべて `touch` で最終受信時刻を更新する。
//! 定期的な ping はアイドル接続が途中の機器に切られないようにするためのもので、
//! 応答のない接続を追い出すのはトランスポートの切断検知に任せる。

use std::sync::Arc;

use seedwall_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, Notice, Timestamp};

use super::SharedHub;

/// 死活確認のユースケース
pub struct LivenessUseCase {
    hub: SharedHub,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl LivenessUseCase {
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

    /// 最終受信時刻を更新する。未登録の接続なら `false`。
    pub async fn touch(&self, id: &ConnectionId) -> bool {
        let now = Timestamp::new(self.clock.now_millis());
        self.hub.lock().await.touch(id, now)
    }

    /// クライアントからの ping に pong を返す
    pub async fn reply_pong(&self, id: &ConnectionId) -> Result<(), MessagePushError> {
        let _hub = self.hub.lock().await;
        self.message_pusher.push_to(id, &Notice::Pong).await
    }

    /// 開いているすべての接続に ping を送り、送れた数を返す
    pub async fn probe_all(&self) -> usize {
        let _hub = self.hub.lock().await;
        let mut targets: Vec<ConnectionId> = self
            .message_pusher
            .open_connections()
            .await
            .into_iter()
            .collect();
        targets.sort();

        match self.message_pusher.broadcast(targets, &Notice::Ping).await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::warn!("Heartbeat probe failed: {}", e);
                0
            }
        }
    }
}
