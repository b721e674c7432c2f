//! Infrastructure layer: wire formats and the concrete adapters behind the
//! domain traits.

pub mod dto;
pub mod message_pusher;
pub mod repository;
