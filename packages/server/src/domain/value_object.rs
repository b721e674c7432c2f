//! Value objects.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Opaque identity of one live transport session.
///
/// Generated at accept time and stable for the lifetime of the session. A
/// reconnecting client always gets a fresh identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Logical display slot, 1 through 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ScreenNumber(u8);

impl ScreenNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 99;

    pub fn new(value: i64) -> Result<Self, ValueObjectError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(ValueObjectError::ScreenNumberOutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ScreenNumber {
    type Error = ValueObjectError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScreenNumber> for i64 {
    fn from(screen: ScreenNumber) -> Self {
        i64::from(screen.0)
    }
}

impl fmt::Display for ScreenNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role a connection plays in the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Display browser bound (eventually) to a screen number
    #[default]
    Peer,
    /// Controller that drives the peers
    Seed,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Peer => f.write_str("peer"),
            Role::Seed => f.write_str("seed"),
        }
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
