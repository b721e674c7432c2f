//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `{"status": "..."}` body used by health and catalog endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDto {
    pub status: String,
}

impl StatusDto {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    pub fn error() -> Self {
        Self {
            status: "error".to_string(),
        }
    }
}

/// Debug view of the whole topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDto {
    pub peers_count: usize,
    pub registered_screens: usize,
    pub seed: Option<String>,
    pub current_preset: Option<String>,
    pub screens: Vec<ScreenDetailDto>,
    pub connections: Vec<ConnectionDetailDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenDetailDto {
    pub screen_number: u8,
    pub members: Vec<super::websocket::ScreenMemberDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetailDto {
    pub client_id: String,
    pub role: String,
    pub screen_number: Option<u8>,
    /// RFC 3339
    pub connected_at: String,
    /// RFC 3339
    pub last_seen: String,
}
