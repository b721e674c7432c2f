//! Seed Arbitrator.
//!
//! At most one connection holds seed authority. A new claim evicts the
//! previous holder; the caller is told who was evicted so it can be notified.

use super::{
    error::HubError,
    value_object::{ConnectionId, Role},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SeedSlot {
    #[default]
    Empty,
    Held(ConnectionId),
}

#[derive(Debug, Default)]
pub struct SeedArbitrator {
    slot: SeedSlot,
}

impl SeedArbitrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self) -> &SeedSlot {
        &self.slot
    }

    pub fn holder(&self) -> Option<&ConnectionId> {
        match &self.slot {
            SeedSlot::Held(id) => Some(id),
            SeedSlot::Empty => None,
        }
    }

    pub fn is_held_by(&self, id: &ConnectionId) -> bool {
        self.holder() == Some(id)
    }

    /// Give the slot to `id`, whose current role must be `seed`.
    ///
    /// Returns the evicted previous holder, if it was a different connection.
    pub fn claim(
        &mut self,
        id: &ConnectionId,
        role: Role,
    ) -> Result<Option<ConnectionId>, HubError> {
        if role != Role::Seed {
            return Err(HubError::NotSeedRole(id.clone()));
        }
        let previous = std::mem::replace(&mut self.slot, SeedSlot::Held(id.clone()));
        match previous {
            SeedSlot::Held(old) if &old != id => Ok(Some(old)),
            _ => Ok(None),
        }
    }

    /// Empty the slot if `id` holds it. Returns whether anything changed.
    pub fn release(&mut self, id: &ConnectionId) -> bool {
        if self.is_held_by(id) {
            self.slot = SeedSlot::Empty;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_claim_empty_slot() {
        // テスト項目: 空きスロットの claim は誰も追い出さない
        // given (前提条件):
        let mut arbitrator = SeedArbitrator::new();

        // when (操作):
        let evicted = arbitrator.claim(&id("c1"), Role::Seed);

        // then (期待する結果):
        assert_eq!(evicted, Ok(None));
        assert_eq!(arbitrator.slot(), &SeedSlot::Held(id("c1")));
    }

    #[test]
    fn test_claim_held_slot_evicts_previous_holder() {
        // テスト項目: 保持中のスロットを別の接続が claim すると前の保持者が返される
        // given (前提条件):
        let mut arbitrator = SeedArbitrator::new();
        arbitrator.claim(&id("c1"), Role::Seed).unwrap();

        // when (操作):
        let evicted = arbitrator.claim(&id("c2"), Role::Seed);

        // then (期待する結果):
        assert_eq!(evicted, Ok(Some(id("c1"))));
        assert!(arbitrator.is_held_by(&id("c2")));
        assert!(!arbitrator.is_held_by(&id("c1")));
    }

    #[test]
    fn test_reclaim_by_holder_evicts_nobody() {
        // テスト項目: 保持者自身の再 claim では追い出しは発生しない
        // given (前提条件):
        let mut arbitrator = SeedArbitrator::new();
        arbitrator.claim(&id("c1"), Role::Seed).unwrap();

        // when (操作):
        let evicted = arbitrator.claim(&id("c1"), Role::Seed);

        // then (期待する結果):
        assert_eq!(evicted, Ok(None));
        assert!(arbitrator.is_held_by(&id("c1")));
    }

    #[test]
    fn test_claim_rejected_for_peer_role() {
        // テスト項目: seed ロールでない接続の claim は拒否され状態は変わらない
        // given (前提条件):
        let mut arbitrator = SeedArbitrator::new();
        arbitrator.claim(&id("c1"), Role::Seed).unwrap();

        // when (操作):
        let result = arbitrator.claim(&id("c2"), Role::Peer);

        // then (期待する結果):
        assert_eq!(result, Err(HubError::NotSeedRole(id("c2"))));
        assert!(arbitrator.is_held_by(&id("c1")));
    }

    #[test]
    fn test_release_only_by_holder() {
        // テスト項目: release は保持者のときだけスロットを空にする
        // given (前提条件):
        let mut arbitrator = SeedArbitrator::new();
        arbitrator.claim(&id("c1"), Role::Seed).unwrap();

        // when (操作):
        let by_other = arbitrator.release(&id("c2"));
        let by_holder = arbitrator.release(&id("c1"));
        let again = arbitrator.release(&id("c1"));

        // then (期待する結果):
        assert!(!by_other);
        assert!(by_holder);
        assert!(!again);
        assert_eq!(arbitrator.slot(), &SeedSlot::Empty);
    }
}
