//! Request handlers.

mod http;
mod websocket;

pub use http::{get_presets, get_topology, health_check, post_presets};
pub use websocket::websocket_handler;
