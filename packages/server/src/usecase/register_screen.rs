//! UseCase: 画面番号の登録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterScreenUseCase::execute() メソッド
//! - 範囲チェック、画面への紐づけ、確認応答、キャッチアップ
//!
//! ### なぜこのテストが必要か
//! - 範囲外（0, 100 など）の画面番号を UI 側の検証に頼らず拒否する
//! - 選択後に登録した peer が現在の内容を受け取れることを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録、別の画面への再登録
//! - 異常系：範囲外の画面番号
//! - エッジケース：選択後の登録（キャッチアップ）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notice, ScreenNumber};

use super::{
    SharedHub,
    error::RegisterScreenError,
    topology::{notify_seed, push_catch_up},
};

/// 範囲外の画面番号に対する registrationError のメッセージ
pub const OUT_OF_RANGE_MESSAGE: &str = "Screen number must be between 1 and 99";

/// 画面登録のユースケース
pub struct RegisterScreenUseCase {
    hub: SharedHub,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RegisterScreenUseCase {
    pub fn new(hub: SharedHub, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            hub,
            message_pusher,
        }
    }

    /// 画面番号を検証して接続を紐づける
    ///
    /// # Arguments
    ///
    /// * `id` - 登録する接続
    /// * `screen_number` - クライアントが送ってきた画面番号（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(ScreenNumber)` - 紐づけた画面番号
    /// * `Err(RegisterScreenError)` - 範囲外、または未登録の接続
    pub async fn execute(
        &self,
        id: &ConnectionId,
        screen_number: i64,
    ) -> Result<ScreenNumber, RegisterScreenError> {
        let Ok(screen) = ScreenNumber::new(screen_number) else {
            let notice = Notice::RegistrationError(OUT_OF_RANGE_MESSAGE.to_string());
            if let Err(e) = self.message_pusher.push_to(id, &notice).await {
                tracing::warn!("Failed to send registrationError to '{}': {}", id, e);
            }
            return Err(RegisterScreenError::OutOfRange(screen_number));
        };

        let mut hub = self.hub.lock().await;

        // 1. Screen Directory に紐づける（以前の画面からは外れる）
        let bound = hub.bind_screen(id, screen)?;
        tracing::info!("Connection '{}' registered as screen {}", id, bound);

        // 2. 確認応答
        let notice = Notice::RegistrationConfirmed(bound);
        if let Err(e) = self.message_pusher.push_to(id, &notice).await {
            tracing::warn!("Failed to send registrationConfirmed to '{}': {}", id, e);
        }

        // 3. seed にトポロジーを通知し、現在の選択を再送
        notify_seed(&hub, self.message_pusher.as_ref()).await;
        push_catch_up(&hub, self.message_pusher.as_ref(), id).await;

        Ok(bound)
    }
}
