//! Outbound notices.
//!
//! Everything the server ever tells a client, expressed in domain terms. The
//! transport adapter decides how a notice looks on the wire.

use super::{
    entity::{Catalog, Demo, Selection},
    registry::TopologyCounts,
    screen_directory::ScreenEntry,
    value_object::{ConnectionId, ScreenNumber},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Welcome sent once, first, on every new connection
    Connected {
        client_id: ConnectionId,
        current_preset: Option<Selection>,
        counts: TopologyCounts,
    },
    /// A broadcast selection; `screen` is set when the demos were filtered for it
    PresetSelected {
        name: String,
        demos: Vec<Demo>,
        screen: Option<ScreenNumber>,
    },
    /// A directed send to one screen
    DemoSent { demo: Demo, screen: ScreenNumber },
    PeersCount(usize),
    RegisteredScreens(usize),
    ScreensList(Vec<ScreenEntry>),
    RegistrationConfirmed(ScreenNumber),
    RegistrationError(String),
    SeedTakenOver,
    SeedDenied(String),
    PresetsUpdated(Catalog),
    Ping,
    Pong,
}

impl Notice {
    pub const SEED_TAKEN_OVER_MESSAGE: &'static str =
        "Another device has become the seed controller";

    /// Echo of an accepted selection, sent back to the seed unfiltered.
    pub fn selection_echo(selection: &Selection) -> Self {
        Notice::PresetSelected {
            name: selection.name.clone(),
            demos: selection.demos.clone(),
            screen: None,
        }
    }
}
