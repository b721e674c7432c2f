//! CatalogRepository trait 定義
//!
//! プリセット/デモのカタログを読み書きするインターフェース。
//! カタログは常にドキュメント全体で置き換えられ、部分更新はしない。

use async_trait::async_trait;
use thiserror::Error;

use super::entity::Catalog;

/// Repository エラー
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog document is invalid: {0}")]
    InvalidDocument(String),
}

/// Catalog Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// カタログ全体を取得
    async fn load(&self) -> Result<Catalog, RepositoryError>;

    /// カタログ全体を置き換え
    async fn replace(&self, catalog: Catalog) -> Result<(), RepositoryError>;
}
