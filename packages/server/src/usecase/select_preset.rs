//! UseCase: プリセット選択のブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SelectPresetUseCase::execute() メソッド
//! - 画面ごとの絞り込み、seed へのエコー、seed 以外からの拒否
//!
//! ### なぜこのテストが必要か
//! - 全画面向けのデモはすべての画面に、画面指定のデモはその画面にだけ届くことを保証する
//! - seed 以外からの選択が一切の送信もキャッシュ変更も起こさないことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数画面へのブロードキャスト
//! - 異常系：peer や引き継がれた元 seed からの選択
//! - エッジケース：同じ画面に複数の接続

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notice, Selection};

use super::{SharedHub, error::SelectPresetError, topology::delivery_notice};

/// プリセット選択のユースケース
pub struct SelectPresetUseCase {
    hub: SharedHub,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SelectPresetUseCase {
    pub fn new(hub: SharedHub, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            hub,
            message_pusher,
        }
    }

    /// seed からの選択をキャッシュし、画面ごとに絞り込んで配信する
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - presetSelected を届けた peer の数
    /// * `Err(SelectPresetError)` - seed 以外からの要求（何も起こらない）
    pub async fn execute(
        &self,
        id: &ConnectionId,
        selection: Selection,
    ) -> Result<usize, SelectPresetError> {
        let mut hub = self.hub.lock().await;

        let echo = Notice::selection_echo(&selection);
        let name = selection.name.clone();

        // 1. 権限チェックとキャッシュ、配信先の計算
        let deliveries = hub.select(id, selection)?;

        // 2. seed にエコー
        if let Err(e) = self.message_pusher.push_to(id, &echo).await {
            tracing::warn!("Failed to echo preset '{}' to seed '{}': {}", name, id, e);
        }

        // 3. 画面ごとの配信
        let mut delivered = 0;
        for delivery in deliveries {
            let to = delivery.to.clone();
            let notice = delivery_notice(&name, delivery);
            match self.message_pusher.push_to(&to, &notice).await {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Failed to deliver preset '{}' to '{}': {}", name, to, e),
            }
        }

        tracing::info!("Preset '{}' delivered to {} peer(s)", name, delivered);
        Ok(delivered)
    }
}
