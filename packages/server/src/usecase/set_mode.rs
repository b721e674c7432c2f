//! UseCase: ロール（mode）と画面番号の設定
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SetModeUseCase::execute() メソッド
//! - seed ロールの取得・引き継ぎ、シークレットによる制限、peer の画面設定とキャッチアップ
//!
//! ### なぜこのテストが必要か
//! - seed 権限は常に1接続だけが持つことを保証する
//! - 追い出された seed に seedTakenOver がちょうど1回届くことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：seed 取得、peer + 画面番号
//! - 異常系：シークレット不一致、未登録の接続
//! - エッジケース：seed の引き継ぎ

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notice, Role, RoleChange, ScreenNumber};

use super::{
    SharedHub,
    error::SetModeError,
    topology::{notify_seed, push_catch_up},
};

/// seed シークレット不一致時に返すメッセージ
pub const SEED_DENIED_MESSAGE: &str = "Invalid seed secret";

/// setMode のユースケース
pub struct SetModeUseCase {
    hub: SharedHub,
    message_pusher: Arc<dyn MessagePusher>,
    /// 設定されていれば seed ロールの取得に一致が必要
    seed_secret: Option<String>,
}

impl SetModeUseCase {
    pub fn new(
        hub: SharedHub,
        message_pusher: Arc<dyn MessagePusher>,
        seed_secret: Option<String>,
    ) -> Self {
        Self {
            hub,
            message_pusher,
            seed_secret,
        }
    }

    /// ロールを適用し、画面番号があれば紐づける
    ///
    /// # Arguments
    ///
    /// * `id` - 要求した接続
    /// * `role` - 新しいロール
    /// * `screen` - 紐づける画面番号（任意）
    /// * `secret` - seed 取得時のシークレット
    ///
    /// # Returns
    ///
    /// * `Ok(RoleChange)` - 変更前のロールと追い出された seed
    /// * `Err(SetModeError)` - 拒否された（状態は変わらない）
    pub async fn execute(
        &self,
        id: &ConnectionId,
        role: Role,
        screen: Option<ScreenNumber>,
        secret: Option<&str>,
    ) -> Result<RoleChange, SetModeError> {
        if role == Role::Seed && !self.secret_matches(secret) {
            if let Err(e) = self
                .message_pusher
                .push_to(id, &Notice::SeedDenied(SEED_DENIED_MESSAGE.to_string()))
                .await
            {
                tracing::warn!("Failed to send seedDenied to '{}': {}", id, e);
            }
            return Err(SetModeError::SeedDenied(id.clone()));
        }

        let mut hub = self.hub.lock().await;

        // 1. ロールを適用（seed の取得・解放もここで行われる）
        let change = hub.set_role(id, role)?;

        // 2. 追い出された seed に通知（切断はしない）
        if let Some(evicted) = &change.evicted {
            tracing::info!("Seed authority moved from '{}' to '{}'", evicted, id);
            let notice = Notice::SeedTakenOver;
            if let Err(e) = self.message_pusher.push_to(evicted, &notice).await {
                tracing::warn!("Failed to send seedTakenOver to '{}': {}", evicted, e);
            }
        }

        // 3. 画面番号を紐づける
        if let Some(screen) = screen {
            hub.bind_screen(id, screen)?;
        }

        tracing::info!(
            "Connection '{}' is now {} (was {})",
            id,
            role,
            change.previous
        );

        // 4. seed にトポロジーを通知し、peer には現在の選択を再送
        notify_seed(&hub, self.message_pusher.as_ref()).await;
        push_catch_up(&hub, self.message_pusher.as_ref(), id).await;

        Ok(change)
    }

    fn secret_matches(&self, secret: Option<&str>) -> bool {
        match &self.seed_secret {
            Some(expected) => secret == Some(expected.as_str()),
            None => true,
        }
    }
}
