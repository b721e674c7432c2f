//! Error types for the Seedwall client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the seed role
    #[error("Seed role denied: {0}")]
    SeedDenied(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The connection was established and later dropped
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Catalog could not be fetched or did not contain what was asked for
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl ClientError {
    /// Whether the reconnect loop should try again after this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::ConnectionError(_) | ClientError::ConnectionLost(_)
        )
    }

    /// Reclassify a transport error raised after the handshake succeeded
    pub fn after_connect(self) -> Self {
        match self {
            ClientError::ConnectionError(message) => ClientError::ConnectionLost(message),
            other => other,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::ConnectionError(e.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Catalog(e.to_string())
    }
}
