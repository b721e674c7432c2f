//! File Catalog Repository 実装
//!
//! ドメイン層が定義する CatalogRepository trait の具体的な実装。
//! カタログを JSON ファイル（既定では `data/presets.json`）に保存します。
//!
//! 書き込みは一時ファイルに書いてから rename するため、読み手が書きかけの
//! ドキュメントを見ることはありません。

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Catalog, CatalogRepository, RepositoryError};

/// JSON ファイルを使った Catalog Repository 実装
///
/// 読み込みはメモリ上のキャッシュから返し、ファイルは起動時と置き換え時にだけ触ります。
pub struct FileCatalogRepository {
    path: PathBuf,
    cache: RwLock<Catalog>,
}

impl FileCatalogRepository {
    /// `path` のカタログを読み込んでリポジトリを作成
    ///
    /// ファイルが存在しない場合は空のカタログで開始します。
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let catalog = match tokio::fs::read_to_string(&path).await {
            Ok(text) => parse_document(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "Catalog file {} not found, starting with an empty catalog",
                    path.display()
                );
                Catalog::empty()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            cache: RwLock::new(catalog),
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "catalog.json".into());
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

fn parse_document(text: &str) -> Result<Catalog, RepositoryError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| RepositoryError::InvalidDocument(e.to_string()))?;
    Catalog::from_value(value).map_err(|e| RepositoryError::InvalidDocument(e.to_string()))
}

#[async_trait]
impl CatalogRepository for FileCatalogRepository {
    async fn load(&self) -> Result<Catalog, RepositoryError> {
        let catalog = self.cache.read().await;
        Ok(catalog.clone())
    }

    async fn replace(&self, catalog: Catalog) -> Result<(), RepositoryError> {
        let text = serde_json::to_string_pretty(catalog.as_value())
            .map_err(|e| RepositoryError::InvalidDocument(e.to_string()))?;

        // 書き込み中の置き換えを直列化するため、ファイル操作の間も書き込みロックを保持する
        let mut cache = self.cache.write().await;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, text).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        *cache = catalog;

        tracing::info!("Catalog saved to {}", self.path.display());
        Ok(())
    }
}
