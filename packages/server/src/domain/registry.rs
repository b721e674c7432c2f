//! Connection Registry.
//!
//! Owns every live connection record. Other components refer to connections
//! by [`ConnectionId`] only.

use std::collections::{BTreeSet, HashMap};

use super::{
    error::HubError,
    value_object::{ConnectionId, Role, ScreenNumber, Timestamp},
};

/// One live transport session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub role: Role,
    pub screen: Option<ScreenNumber>,
    pub connected_at: Timestamp,
    /// Last inbound activity of any kind
    pub last_seen: Timestamp,
}

/// Peer and occupied-screen counts reported to the seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopologyCounts {
    pub peers: usize,
    pub screens: usize,
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection as an unbound peer.
    pub fn admit(&mut self, now: Timestamp) -> ConnectionId {
        let id = ConnectionId::generate();
        self.connections.insert(
            id.clone(),
            Connection {
                id: id.clone(),
                role: Role::Peer,
                screen: None,
                connected_at: now,
                last_seen: now,
            },
        );
        id
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Change the role of a connection, returning the previous role.
    pub fn set_role(&mut self, id: &ConnectionId, role: Role) -> Result<Role, HubError> {
        let connection = self
            .connections
            .get_mut(id)
            .ok_or_else(|| HubError::UnknownConnection(id.clone()))?;
        Ok(std::mem::replace(&mut connection.role, role))
    }

    /// Record the screen binding of a connection.
    pub fn set_screen(
        &mut self,
        id: &ConnectionId,
        screen: Option<ScreenNumber>,
    ) -> Result<(), HubError> {
        let connection = self
            .connections
            .get_mut(id)
            .ok_or_else(|| HubError::UnknownConnection(id.clone()))?;
        connection.screen = screen;
        Ok(())
    }

    /// Remove a connection. Unknown ids are a no-op.
    pub fn retract(&mut self, id: &ConnectionId) -> Option<Connection> {
        self.connections.remove(id)
    }

    /// Refresh the liveness timestamp. Returns `false` for unknown ids.
    pub fn touch(&mut self, id: &ConnectionId, now: Timestamp) -> bool {
        match self.connections.get_mut(id) {
            Some(connection) => {
                connection.last_seen = now;
                true
            }
            None => false,
        }
    }

    pub fn snapshot_counts(&self) -> TopologyCounts {
        let peers = self
            .connections
            .values()
            .filter(|c| c.role == Role::Peer)
            .count();
        let screens = self
            .connections
            .values()
            .filter_map(|c| c.screen)
            .collect::<BTreeSet<_>>()
            .len();
        TopologyCounts { peers, screens }
    }

    /// All connections, oldest first.
    pub fn connections(&self) -> Vec<&Connection> {
        let mut connections: Vec<&Connection> = self.connections.values().collect();
        connections.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_registers_unbound_peer() {
        // テスト項目: 新規接続はスクリーン未登録の peer として登録される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();

        // when (操作):
        let id = registry.admit(Timestamp::new(1000));

        // then (期待する結果):
        let connection = registry.get(&id).unwrap();
        assert_eq!(connection.role, Role::Peer);
        assert_eq!(connection.screen, None);
        assert_eq!(connection.connected_at, Timestamp::new(1000));
        assert_eq!(connection.last_seen, Timestamp::new(1000));
    }

    #[test]
    fn test_admit_twice_yields_distinct_ids() {
        // テスト項目: 同じユーザーの再接続でも毎回新しい ID が払い出される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();

        // when (操作):
        let first = registry.admit(Timestamp::new(1));
        let second = registry.admit(Timestamp::new(2));

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_set_role_unknown_connection() {
        // テスト項目: 未登録の ID へのロール変更はエラーになり状態は変わらない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let unknown = ConnectionId::new("ghost".to_string()).unwrap();

        // when (操作):
        let result = registry.set_role(&unknown, Role::Seed);

        // then (期待する結果):
        assert_eq!(result, Err(HubError::UnknownConnection(unknown)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_set_role_returns_previous_role() {
        // テスト項目: ロール変更は変更前のロールを返す
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let id = registry.admit(Timestamp::new(1));

        // when (操作):
        let previous = registry.set_role(&id, Role::Seed);

        // then (期待する結果):
        assert_eq!(previous, Ok(Role::Peer));
        assert_eq!(registry.get(&id).unwrap().role, Role::Seed);
    }

    #[test]
    fn test_retract_is_idempotent() {
        // テスト項目: retract は冪等である
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let id = registry.admit(Timestamp::new(1));

        // when (操作):
        let first = registry.retract(&id);
        let second = registry.retract(&id);

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_touch_updates_last_seen() {
        // テスト項目: touch で最終アクティビティ時刻が更新される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let id = registry.admit(Timestamp::new(1));

        // when (操作):
        let touched = registry.touch(&id, Timestamp::new(5000));

        // then (期待する結果):
        assert!(touched);
        assert_eq!(registry.get(&id).unwrap().last_seen, Timestamp::new(5000));
        assert_eq!(registry.get(&id).unwrap().connected_at, Timestamp::new(1));
    }

    #[test]
    fn test_snapshot_counts() {
        // テスト項目: peer 数と使用中スクリーン数（重複なし）を数える
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        let seed = registry.admit(Timestamp::new(1));
        let a = registry.admit(Timestamp::new(2));
        let b = registry.admit(Timestamp::new(3));
        let _unbound = registry.admit(Timestamp::new(4));
        registry.set_role(&seed, Role::Seed).unwrap();
        let three = ScreenNumber::new(3).unwrap();
        registry.set_screen(&a, Some(three)).unwrap();
        registry.set_screen(&b, Some(three)).unwrap();

        // when (操作):
        let counts = registry.snapshot_counts();

        // then (期待する結果):
        assert_eq!(counts, TopologyCounts { peers: 3, screens: 1 });
    }
}
