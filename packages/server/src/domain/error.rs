//! Domain errors.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Connection ID must not be empty")]
    EmptyConnectionId,

    #[error("Screen number {0} is out of range (must be between 1 and 99)")]
    ScreenNumberOutOfRange(i64),

    #[error("Catalog document must be a JSON object")]
    CatalogNotObject,
}

/// Errors raised by the hub aggregate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("Connection '{0}' is not registered")]
    UnknownConnection(ConnectionId),

    /// The connection does not hold seed authority
    #[error("Connection '{0}' does not hold seed authority")]
    NotSeed(ConnectionId),

    /// Only a connection in the seed role may occupy the seed slot
    #[error("Connection '{0}' is not in the seed role")]
    NotSeedRole(ConnectionId),
}
