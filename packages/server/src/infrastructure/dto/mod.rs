//! Data Transfer Objects (DTOs) for Seedwall.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
