//! Seedwall terminal client.
//!
//! Plays either role of the fan-out network: a peer display bound to a
//! screen number, or the seed console that drives the peers.

pub mod catalog;
pub mod command;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;
