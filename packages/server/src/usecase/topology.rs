//! UseCase: トポロジー通知とデバッグ用スナップショット
//!
//! 接続・画面・ロールが変わるたびに、現在の seed に件数と画面一覧を送る。

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionId, Delivery, Hub, MessagePusher, Notice, ScreenEntry, TopologyCounts,
};

use super::SharedHub;

/// 現在の seed にトポロジー（peer 数・登録画面数・画面一覧）を送る
///
/// seed がいなければ何もしない。画面メンバーのオンライン状態は送信時点の
/// トランスポートの状態から計算する。
pub(crate) async fn notify_seed(hub: &Hub, message_pusher: &dyn MessagePusher) {
    let Some(seed) = hub.seed() else {
        return;
    };

    let counts = hub.counts();
    let open = message_pusher.open_connections().await;
    let screens = hub.list_screens(|id| open.contains(id));

    let notices = [
        Notice::PeersCount(counts.peers),
        Notice::RegisteredScreens(counts.screens),
        Notice::ScreensList(screens),
    ];
    for notice in &notices {
        if let Err(e) = message_pusher.push_to(seed, notice).await {
            tracing::warn!("Failed to notify seed '{}' of topology: {}", seed, e);
            return;
        }
    }
    tracing::debug!(
        "Topology sent to seed '{}' ({} peers, {} screens)",
        seed,
        counts.peers,
        counts.screens
    );
}

/// 画面ごとに絞り込んだ選択を presetSelected として作る
pub(crate) fn delivery_notice(name: &str, delivery: Delivery) -> Notice {
    Notice::PresetSelected {
        name: name.to_string(),
        demos: delivery.demos,
        screen: Some(delivery.screen),
    }
}

/// キャッシュ済みの選択を、画面に紐づいた peer に再送する
///
/// 送るものがあれば `true`。
pub(crate) async fn push_catch_up(
    hub: &Hub,
    message_pusher: &dyn MessagePusher,
    id: &ConnectionId,
) -> bool {
    let (Some(selection), Some(delivery)) = (hub.current_selection(), hub.catch_up(id)) else {
        return false;
    };

    let screen = delivery.screen;
    let notice = delivery_notice(&selection.name, delivery);
    match message_pusher.push_to(id, &notice).await {
        Ok(()) => {
            tracing::info!(
                "Caught up '{}' on screen {} with preset '{}'",
                id,
                screen,
                selection.name
            );
            true
        }
        Err(e) => {
            tracing::warn!("Failed to catch up '{}': {}", id, e);
            false
        }
    }
}

/// デバッグ表示用のトポロジー全体
#[derive(Debug, Clone, PartialEq)]
pub struct TopologySnapshot {
    pub counts: TopologyCounts,
    pub seed: Option<ConnectionId>,
    pub current_preset: Option<String>,
    pub screens: Vec<ScreenEntry>,
    pub connections: Vec<Connection>,
}

/// トポロジー取得のユースケース
pub struct GetTopologyUseCase {
    hub: SharedHub,
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetTopologyUseCase {
    pub fn new(hub: SharedHub, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            hub,
            message_pusher,
        }
    }

    pub async fn execute(&self) -> TopologySnapshot {
        let hub = self.hub.lock().await;
        let open = self.message_pusher.open_connections().await;

        TopologySnapshot {
            counts: hub.counts(),
            seed: hub.seed().cloned(),
            current_preset: hub.current_selection().map(|s| s.name.clone()),
            screens: hub.list_screens(|id| open.contains(id)),
            connections: hub.registry().connections().into_iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Role, ScreenNumber, Timestamp},
        usecase::test_support::{attach, drain, shared_hub, test_message_pusher},
    };

    #[tokio::test]
    async fn test_notify_seed_without_seed_sends_nothing() {
        // テスト項目: seed がいない場合は誰にも送らない
        // given (前提条件):
        let hub = shared_hub();
        let pusher = test_message_pusher();
        let (peer, mut rx) = attach(&hub, &pusher).await;
        hub.lock()
            .await
            .bind_screen(&peer, ScreenNumber::new(2).unwrap())
            .unwrap();

        // when (操作):
        notify_seed(&*hub.lock().await, pusher.as_ref()).await;

        // then (期待する結果):
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_notify_seed_reports_counts_and_screens() {
        // テスト項目: seed に peersCount, registeredScreens, screensList の順で届く
        // given (前提条件):
        let hub = shared_hub();
        let pusher = test_message_pusher();
        let (seed, mut seed_rx) = attach(&hub, &pusher).await;
        let (peer, _peer_rx) = attach(&hub, &pusher).await;
        {
            let mut hub = hub.lock().await;
            hub.set_role(&seed, Role::Seed).unwrap();
            hub.bind_screen(&peer, ScreenNumber::new(4).unwrap()).unwrap();
        }

        // when (操作):
        notify_seed(&*hub.lock().await, pusher.as_ref()).await;

        // then (期待する結果):
        let messages = drain(&mut seed_rx);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["type"], "peersCount");
        assert_eq!(messages[0]["count"], 1);
        assert_eq!(messages[1]["type"], "registeredScreens");
        assert_eq!(messages[1]["count"], 1);
        assert_eq!(messages[2]["type"], "screensList");
        assert_eq!(messages[2]["screens"][0][0], 4);
        assert_eq!(messages[2]["screens"][0][1][0]["clientId"], peer.as_str());
        assert_eq!(messages[2]["screens"][0][1][0]["online"], true);
    }

    #[tokio::test]
    async fn test_screen_member_offline_once_transport_closes() {
        // テスト項目: トランスポートが閉じたメンバーは online=false として報告される
        // given (前提条件):
        let hub = shared_hub();
        let pusher = test_message_pusher();
        let (seed, mut seed_rx) = attach(&hub, &pusher).await;
        let (peer, peer_rx) = attach(&hub, &pusher).await;
        {
            let mut hub = hub.lock().await;
            hub.set_role(&seed, Role::Seed).unwrap();
            hub.bind_screen(&peer, ScreenNumber::new(7).unwrap()).unwrap();
        }

        // when (操作):
        drop(peer_rx);
        notify_seed(&*hub.lock().await, pusher.as_ref()).await;

        // then (期待する結果):
        let messages = drain(&mut seed_rx);
        assert_eq!(messages[2]["screens"][0][1][0]["online"], false);
    }

    #[tokio::test]
    async fn test_get_topology_snapshot() {
        // テスト項目: デバッグ用スナップショットに seed・画面・接続が含まれる
        // given (前提条件):
        let hub = shared_hub();
        let pusher = test_message_pusher();
        let (seed, _seed_rx) = attach(&hub, &pusher).await;
        let (peer, _peer_rx) = attach(&hub, &pusher).await;
        {
            let mut hub = hub.lock().await;
            hub.set_role(&seed, Role::Seed).unwrap();
            hub.bind_screen(&peer, ScreenNumber::new(1).unwrap()).unwrap();
            hub.touch(&peer, Timestamp::new(99));
        }
        let usecase = GetTopologyUseCase::new(hub.clone(), pusher.clone());

        // when (操作):
        let snapshot = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(snapshot.counts, TopologyCounts { peers: 1, screens: 1 });
        assert_eq!(snapshot.seed, Some(seed));
        assert_eq!(snapshot.current_preset, None);
        assert_eq!(snapshot.screens.len(), 1);
        assert_eq!(snapshot.connections.len(), 2);
        let peer_record = snapshot
            .connections
            .iter()
            .find(|c| c.id == peer)
            .unwrap();
        assert_eq!(peer_record.last_seen, Timestamp::new(99));
    }
}
