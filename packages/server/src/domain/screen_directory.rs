//! Screen Directory.
//!
//! Maps a logical screen number to the set of connections claiming it. More
//! than one physical client may share a screen (a reloaded page opens its new
//! connection before the old one goes away), so every entry is a set.

use std::collections::{BTreeMap, BTreeSet};

use super::value_object::{ConnectionId, ScreenNumber};

/// One member of a screen in a topology snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenMember {
    pub id: ConnectionId,
    pub online: bool,
}

/// One screen and its members in a topology snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenEntry {
    pub screen: ScreenNumber,
    pub members: Vec<ScreenMember>,
}

/// Invariants: an id is a member of at most one screen, and no entry is ever
/// left with an empty member set.
#[derive(Debug, Default)]
pub struct ScreenDirectory {
    screens: BTreeMap<ScreenNumber, BTreeSet<ConnectionId>>,
}

impl ScreenDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `id` onto `screen`, dropping any previous membership first.
    /// Returns the bound screen number.
    pub fn bind(&mut self, screen: ScreenNumber, id: ConnectionId) -> ScreenNumber {
        self.unbind(&id);
        self.screens.entry(screen).or_default().insert(id);
        screen
    }

    /// Remove `id` from whatever screen it belongs to.
    pub fn unbind(&mut self, id: &ConnectionId) -> Option<ScreenNumber> {
        let screen = self.screen_of(id)?;
        if let Some(members) = self.screens.get_mut(&screen) {
            members.remove(id);
            if members.is_empty() {
                self.screens.remove(&screen);
            }
        }
        Some(screen)
    }

    pub fn screen_of(&self, id: &ConnectionId) -> Option<ScreenNumber> {
        self.screens
            .iter()
            .find(|(_, members)| members.contains(id))
            .map(|(screen, _)| *screen)
    }

    pub fn members_of(&self, screen: ScreenNumber) -> BTreeSet<ConnectionId> {
        self.screens.get(&screen).cloned().unwrap_or_default()
    }

    /// Occupied screens in ascending order with their members.
    pub fn iter(&self) -> impl Iterator<Item = (ScreenNumber, &BTreeSet<ConnectionId>)> {
        self.screens.iter().map(|(screen, members)| (*screen, members))
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Full topology snapshot. `is_online` is asked about every member at
    /// call time.
    pub fn list_screens(&self, is_online: impl Fn(&ConnectionId) -> bool) -> Vec<ScreenEntry> {
        self.screens
            .iter()
            .map(|(screen, members)| ScreenEntry {
                screen: *screen,
                members: members
                    .iter()
                    .map(|id| ScreenMember {
                        id: id.clone(),
                        online: is_online(id),
                    })
                    .collect(),
            })
            .collect()
    }
}
