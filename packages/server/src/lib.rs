//! Seedwall server library.
//!
//! One seed controller drives many screen displays over WebSocket. The server
//! tracks connections and their screen bindings, arbitrates the single seed
//! role, and routes seed commands to the screens they target.

// layers
pub mod domain;
pub mod infrastructure;
pub mod tasks;
pub mod ui;
pub mod usecase;

pub mod bootstrap;
pub mod config;
pub mod error;

pub use bootstrap::build_server;
pub use config::ServerConfig;
pub use error::ServerError;
