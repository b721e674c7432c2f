//! UseCase: カタログ（プリセット・デモ）の取得と置き換え
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CatalogUseCase::get() / replace() メソッド
//!
//! ### なぜこのテストが必要か
//! - 置き換えがドキュメント全体で行われ、開いている接続すべてに presetsUpdated が届くことを保証する
//! - 保存に失敗した場合は通知しないことを確認する
//! - 同時に置き換えても、最後に届く通知が保存済みのカタログと一致することを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：取得、置き換えと通知
//! - 異常系：オブジェクトでないドキュメント、保存失敗
//! - エッジケース：置き換えの並行実行

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{Catalog, CatalogRepository, ConnectionId, MessagePusher, Notice};

use super::{SharedHub, error::CatalogError};

/// カタログのユースケース
pub struct CatalogUseCase {
    /// Repository（カタログ保存の抽象化）
    repository: Arc<dyn CatalogRepository>,
    hub: SharedHub,
    message_pusher: Arc<dyn MessagePusher>,
}

impl CatalogUseCase {
    pub fn new(
        repository: Arc<dyn CatalogRepository>,
        hub: SharedHub,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            hub,
            message_pusher,
        }
    }

    pub async fn get(&self) -> Result<Catalog, CatalogError> {
        Ok(self.repository.load().await?)
    }

    /// カタログ全体を置き換え、開いている全接続に presetsUpdated を送る
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 通知を届けた接続の数
    /// * `Err(CatalogError)` - 不正なドキュメント、または保存失敗（通知はしない）
    pub async fn replace(&self, document: Value) -> Result<usize, CatalogError> {
        let catalog = Catalog::from_value(document)?;

        // 保存と通知を同じロックの中で行い、通知の順序を保存の順序に揃える
        let _hub = self.hub.lock().await;
        self.repository.replace(catalog.clone()).await?;
        let mut targets: Vec<ConnectionId> = self
            .message_pusher
            .open_connections()
            .await
            .into_iter()
            .collect();
        targets.sort();

        let notice = Notice::PresetsUpdated(catalog);
        let notified = match self.message_pusher.broadcast(targets, &notice).await {
            Ok(notified) => notified,
            Err(e) => {
                tracing::warn!("Failed to broadcast presetsUpdated: {}", e);
                0
            }
        };
        tracing::info!("Catalog replaced, {} connection(s) notified", notified);

        Ok(notified)
    }
}
