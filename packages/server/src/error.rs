//! Startup and serve errors of the server binary.

use thiserror::Error;

use crate::{config::ConfigError, domain::RepositoryError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open catalog: {0}")]
    Catalog(#[from] RepositoryError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
