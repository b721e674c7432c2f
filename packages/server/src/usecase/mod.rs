//! UseCase 層
//!
//! クライアントから届いたイベント1件ごとに、Hub をロックして状態を更新し、
//! 発生した送信をすべてロック中に MessagePusher へ積む。
//! これにより状態変更が交互に混ざることはなく、宛先ごとの送信順はイベント順と一致する。

pub mod catalog;
pub mod connect;
pub mod error;
pub mod liveness;
pub mod register_screen;
pub mod select_preset;
pub mod send_demo;
pub mod set_mode;
pub mod topology;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::Hub;

/// プロセス全体で共有する Hub
pub type SharedHub = Arc<Mutex<Hub>>;

pub use catalog::CatalogUseCase;
pub use connect::{ConnectUseCase, DisconnectUseCase};
pub use error::{
    CatalogError, RegisterScreenError, SelectPresetError, SendDemoError, SetModeError,
};
pub use liveness::LivenessUseCase;
pub use register_screen::RegisterScreenUseCase;
pub use select_preset::SelectPresetUseCase;
pub use send_demo::SendDemoUseCase;
pub use set_mode::SetModeUseCase;
pub use topology::{GetTopologyUseCase, TopologySnapshot};
