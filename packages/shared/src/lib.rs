//! Utilities shared by the Seedwall server and client binaries.

pub mod logger;
pub mod time;
