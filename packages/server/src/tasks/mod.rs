//! Background tasks.

pub mod heartbeat;

pub use heartbeat::start_heartbeat;
