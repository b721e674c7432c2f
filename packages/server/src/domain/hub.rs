//! Hub aggregate.
//!
//! Combines the connection registry, the screen directory, the seed
//! arbitrator and the cached broadcast selection, and keeps them consistent:
//! role changes drive seed claims and releases, screen bindings are mirrored
//! on the connection record, and retraction cascades through all three.
//!
//! The hub never talks to the network. Routing operations return the list of
//! deliveries to make and leave the sending to the caller.

use super::{
    entity::{Demo, Selection},
    error::HubError,
    registry::{Connection, ConnectionRegistry, TopologyCounts},
    screen_directory::{ScreenDirectory, ScreenEntry},
    seed_arbitrator::SeedArbitrator,
    value_object::{ConnectionId, Role, ScreenNumber, Timestamp},
};

/// Outcome of a role change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChange {
    pub previous: Role,
    /// Previous seed holder displaced by this change
    pub evicted: Option<ConnectionId>,
}

/// What a retraction removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retracted {
    pub connection: Option<Connection>,
    pub screen: Option<ScreenNumber>,
    pub released_seed: bool,
}

impl Retracted {
    pub fn is_noop(&self) -> bool {
        self.connection.is_none() && self.screen.is_none() && !self.released_seed
    }
}

/// Screen-filtered demos owed to one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub to: ConnectionId,
    pub screen: ScreenNumber,
    pub demos: Vec<Demo>,
}

#[derive(Debug, Default)]
pub struct Hub {
    registry: ConnectionRegistry,
    directory: ScreenDirectory,
    arbitrator: SeedArbitrator,
    current_selection: Option<Selection>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn directory(&self) -> &ScreenDirectory {
        &self.directory
    }

    pub fn current_selection(&self) -> Option<&Selection> {
        self.current_selection.as_ref()
    }

    pub fn seed(&self) -> Option<&ConnectionId> {
        self.arbitrator.holder()
    }

    pub fn admit(&mut self, now: Timestamp) -> ConnectionId {
        self.registry.admit(now)
    }

    pub fn touch(&mut self, id: &ConnectionId, now: Timestamp) -> bool {
        self.registry.touch(id, now)
    }

    /// Change the role of `id`, claiming or releasing seed authority to match.
    pub fn set_role(&mut self, id: &ConnectionId, role: Role) -> Result<RoleChange, HubError> {
        let previous = self.registry.set_role(id, role)?;
        let evicted = match role {
            Role::Seed => self.arbitrator.claim(id, role)?,
            Role::Peer => {
                self.arbitrator.release(id);
                None
            }
        };
        Ok(RoleChange { previous, evicted })
    }

    /// Bind `id` to `screen`, replacing any previous binding.
    pub fn bind_screen(
        &mut self,
        id: &ConnectionId,
        screen: ScreenNumber,
    ) -> Result<ScreenNumber, HubError> {
        self.registry.set_screen(id, Some(screen))?;
        Ok(self.directory.bind(screen, id.clone()))
    }

    /// Remove every trace of `id`. Safe to repeat and safe after a partial
    /// earlier attempt.
    pub fn retract(&mut self, id: &ConnectionId) -> Retracted {
        let screen = self.directory.unbind(id);
        let released_seed = self.arbitrator.release(id);
        let connection = self.registry.retract(id);
        Retracted {
            connection,
            screen,
            released_seed,
        }
    }

    /// Seed-only operations are accepted solely from the slot holder.
    pub fn authorize_seed(&self, id: &ConnectionId) -> Result<(), HubError> {
        let in_seed_role = self
            .registry
            .get(id)
            .is_some_and(|connection| connection.role == Role::Seed);
        if in_seed_role && self.arbitrator.is_held_by(id) {
            Ok(())
        } else {
            Err(HubError::NotSeed(id.clone()))
        }
    }

    /// Accept a broadcast selection from the seed, cache it, and compute the
    /// per-connection deliveries.
    pub fn select(
        &mut self,
        id: &ConnectionId,
        selection: Selection,
    ) -> Result<Vec<Delivery>, HubError> {
        self.authorize_seed(id)?;
        let deliveries = self.fan_out(&selection);
        self.current_selection = Some(selection);
        Ok(deliveries)
    }

    /// Members of `screen` a directed send from `id` should reach.
    pub fn directed_targets(
        &self,
        id: &ConnectionId,
        screen: ScreenNumber,
    ) -> Result<Vec<ConnectionId>, HubError> {
        self.authorize_seed(id)?;
        Ok(self.directory.members_of(screen).into_iter().collect())
    }

    /// The cached selection filtered for `id`'s screen, if `id` is a bound
    /// peer and the filtered set is non-empty.
    pub fn catch_up(&self, id: &ConnectionId) -> Option<Delivery> {
        let connection = self.registry.get(id)?;
        if connection.role != Role::Peer {
            return None;
        }
        let screen = self.directory.screen_of(id)?;
        let demos = self.current_selection.as_ref()?.for_screen(screen);
        if demos.is_empty() {
            return None;
        }
        Some(Delivery {
            to: id.clone(),
            screen,
            demos,
        })
    }

    pub fn counts(&self) -> TopologyCounts {
        self.registry.snapshot_counts()
    }

    pub fn list_screens(&self, is_online: impl Fn(&ConnectionId) -> bool) -> Vec<ScreenEntry> {
        self.directory.list_screens(is_online)
    }

    fn fan_out(&self, selection: &Selection) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        for (screen, members) in self.directory.iter() {
            let demos = selection.for_screen(screen);
            if demos.is_empty() {
                continue;
            }
            for member in members {
                let is_peer = self
                    .registry
                    .get(member)
                    .is_some_and(|connection| connection.role == Role::Peer);
                if is_peer {
                    deliveries.push(Delivery {
                        to: member.clone(),
                        screen,
                        demos: demos.clone(),
                    });
                }
            }
        }
        deliveries
    }
}
