//! UseCase: 個別デモ送信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendDemoUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 指定した画面のメンバー全員に individual 付きで届くことを保証する
//! - 誰もいない画面への送信がエラーにならず何も送らないことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：画面への個別送信
//! - 異常系：seed 以外からの送信
//! - エッジケース：メンバーのいない画面

use std::sync::Arc;

use crate::domain::{ConnectionId, Demo, MessagePusher, Notice, ScreenNumber};

use super::{SharedHub, error::SendDemoError};

/// 個別デモ送信のユースケース
pub struct SendDemoUseCase {
    hub: SharedHub,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendDemoUseCase {
    pub fn new(hub: SharedHub, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            hub,
            message_pusher,
        }
    }

    /// `screen` のメンバー全員にデモを1件送る
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 届けた接続の数（メンバーがいなければ 0）
    /// * `Err(SendDemoError)` - seed 以外からの要求
    pub async fn execute(
        &self,
        id: &ConnectionId,
        screen: ScreenNumber,
        demo: Demo,
    ) -> Result<usize, SendDemoError> {
        let hub = self.hub.lock().await;

        let targets = hub.directed_targets(id, screen)?;
        if targets.is_empty() {
            tracing::info!("No connections on screen {}, demo not sent", screen);
            return Ok(0);
        }

        let notice = Notice::DemoSent { demo, screen };
        let delivered = self.message_pusher.broadcast(targets, &notice).await?;
        tracing::info!("Demo sent to {} connection(s) on screen {}", delivered, screen);

        Ok(delivered)
    }
}
