//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{ConnectionId, HubError, MessagePushError, RepositoryError, ValueObjectError};

/// setMode のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetModeError {
    /// 設定されたシークレットと一致しない seed 要求
    #[error("seed secret mismatch for connection '{0}'")]
    SeedDenied(ConnectionId),

    #[error(transparent)]
    Hub(#[from] HubError),
}

/// registerScreen のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterScreenError {
    #[error("screen number {0} is out of range")]
    OutOfRange(i64),

    #[error(transparent)]
    Hub(#[from] HubError),
}

/// selectPreset のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectPresetError {
    #[error(transparent)]
    Hub(#[from] HubError),
}

/// sendIndividualDemo のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendDemoError {
    #[error(transparent)]
    Hub(#[from] HubError),

    #[error("failed to deliver demo: {0}")]
    Push(#[from] MessagePushError),
}

/// カタログ読み書きのエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog document rejected: {0}")]
    InvalidDocument(#[from] ValueObjectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
