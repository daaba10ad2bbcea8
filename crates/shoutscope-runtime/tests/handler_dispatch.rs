//! Replays of command and event sequences through the watch handlers
//!
//! Drives `WatchHandlers` over a `WatchState` with a real in-memory overlay
//! node behind the `SubscriptionManager`, one step at a time, the way the
//! watch task dispatches them.

use std::sync::Arc;

use shoutscope_core::{AppEvent, GroupName, NetworkEvent, Overlay, PeerId, WatchFilter};
use shoutscope_harness::{MemoryNetwork, MemoryNode};
use shoutscope_runtime::{SubscriptionManager, WatchHandlers, WatchState};
use tokio_test::assert_ok;

// ----------------------------------------------------------------------------
// Test Utilities
// ----------------------------------------------------------------------------

struct Replay {
    network: MemoryNetwork,
    observer: Arc<MemoryNode>,
    subscriptions: SubscriptionManager,
    state: WatchState,
    observed: Vec<String>,
}

impl Replay {
    fn new() -> Self {
        let network = MemoryNetwork::new();
        let (observer, _events) = assert_ok!(network.spawn_node("observer"));
        let observer = Arc::new(observer);
        Self {
            subscriptions: SubscriptionManager::new(observer.clone()),
            network,
            observer,
            state: WatchState::new(),
            observed: Vec::new(),
        }
    }

    async fn remote(&self, name: &str, groups: &[&str]) -> MemoryNode {
        let (node, _events) = assert_ok!(self.network.spawn_node(name));
        for group in groups {
            assert_ok!(node.join(&GroupName::from(*group)).await);
        }
        node
    }

    async fn watch_peer(&mut self, peer_id: PeerId) {
        WatchHandlers::handle_watch_peer(&mut self.state, &self.subscriptions, peer_id).await;
    }

    async fn watch_group(&mut self, group: &str) {
        WatchHandlers::handle_watch_group(
            &mut self.state,
            &self.subscriptions,
            GroupName::from(group),
        )
        .await;
    }

    async fn clear(&mut self) {
        WatchHandlers::handle_clear_watch(&mut self.state, &self.subscriptions).await;
    }

    fn event(&mut self, event: NetworkEvent) {
        if let Some(AppEvent::ShoutObserved { payload, .. }) =
            WatchHandlers::handle_network_event(&mut self.state, event)
        {
            self.observed.push(payload);
        }
    }

    async fn own_groups(&self) -> Vec<GroupName> {
        assert_ok!(self.observer.own_groups().await)
    }
}

fn shout(peer: &str, name: &str, group: &str, payload: &str) -> NetworkEvent {
    NetworkEvent::Shout {
        peer_id: PeerId::from(peer),
        name: name.to_string(),
        group: GroupName::from(group),
        payload: payload.to_string(),
    }
}

// ----------------------------------------------------------------------------
// Scenarios
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_inactive_then_group_then_other_peer() {
    let mut replay = Replay::new();

    replay.event(shout("P1", "Alice", "G1", "hi"));
    assert!(replay.observed.is_empty());
    assert_eq!(replay.state.directory.lookup(&PeerId::from("P1")), Some("Alice"));

    replay.watch_group("G1").await;
    replay.event(shout("P1", "Alice", "G1", "hi"));
    assert_eq!(replay.observed, vec!["hi"]);
    assert_eq!(replay.own_groups().await, vec![GroupName::from("G1")]);

    replay.watch_peer(PeerId::from("P2")).await;
    replay.event(shout("P1", "Alice", "G1", "hi"));

    assert_eq!(replay.observed, vec!["hi"]);
    assert_eq!(replay.state.filter, WatchFilter::Peer(PeerId::from("P2")));
    assert_eq!(replay.state.stats.shouts_observed, 1);
    assert_eq!(replay.state.stats.shouts_suppressed, 2);
}

#[tokio::test]
async fn test_watch_peer_joins_its_groups_and_clear_leaves_them() {
    let mut replay = Replay::new();
    let alice = replay.remote("Alice", &["ops", "GLOBAL"]).await;

    replay.watch_peer(alice.peer_id()).await;
    assert_eq!(
        replay.own_groups().await,
        vec![GroupName::from("GLOBAL"), GroupName::from("ops")]
    );

    replay.event(NetworkEvent::Shout {
        peer_id: alice.peer_id(),
        name: "Alice".to_string(),
        group: GroupName::from("ops"),
        payload: "deploy finished".to_string(),
    });
    replay.event(shout("P9", "Mallory", "ops", "not alice"));
    assert_eq!(replay.observed, vec!["deploy finished"]);

    replay.clear().await;
    assert!(replay.own_groups().await.is_empty());
    assert_eq!(replay.state.filter, WatchFilter::Inactive);
    assert_eq!(replay.state.stats.groups_joined, 2);
    assert_eq!(replay.state.stats.groups_left, 2);
}

#[tokio::test]
async fn test_membership_events_only_refresh_the_directory() {
    let mut replay = Replay::new();
    replay.watch_group("G1").await;

    replay.event(NetworkEvent::Enter {
        peer_id: PeerId::from("P1"),
        name: "Alice".to_string(),
        address: "tcp://127.0.0.1:49152".to_string(),
    });
    replay.event(NetworkEvent::Join {
        peer_id: PeerId::from("P1"),
        name: "Alicia".to_string(),
        group: GroupName::from("G1"),
    });
    replay.event(NetworkEvent::Exit {
        peer_id: PeerId::from("P1"),
        name: "Alicia".to_string(),
    });

    assert!(replay.observed.is_empty());
    assert_eq!(replay.state.directory.lookup(&PeerId::from("P1")), Some("Alicia"));
    assert_eq!(replay.state.stats.shouts_suppressed, 0);
}

#[tokio::test]
async fn test_rejected_join_still_switches_the_filter() {
    let mut replay = Replay::new();

    replay.watch_group("").await;

    assert_eq!(replay.state.filter, WatchFilter::Group(GroupName::from("")));
    assert_eq!(replay.state.stats.groups_joined, 0);
    assert_eq!(replay.state.stats.subscription_failures, 1);
    assert!(replay.own_groups().await.is_empty());
}
