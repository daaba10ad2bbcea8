//! Simulated peers driving traffic over the in-memory overlay

use std::time::Duration;

use shoutscope_core::{GroupName, NetworkEvent, NetworkEventReceiver, Overlay};
use shoutscope_harness::{MemoryNetwork, SimulatedPeers, SimulationConfig};
use tokio::time::timeout;

async fn collect_shouts(receiver: &mut NetworkEventReceiver, count: usize) -> Vec<(String, String, String)> {
    let mut shouts = Vec::with_capacity(count);
    while shouts.len() < count {
        let event = timeout(Duration::from_secs(2), receiver.recv())
            .await
            .expect("simulated peers should keep shouting")
            .expect("network should stay up");
        if let NetworkEvent::Shout {
            name,
            group,
            payload,
            ..
        } = event
        {
            shouts.push((name, group.to_string(), payload));
        }
    }
    shouts
}

async fn run_seeded(seed: u64) -> Vec<(String, String, String)> {
    let network = MemoryNetwork::new();
    let (observer, mut events) = network.spawn_node("observer").unwrap();
    for group in ["GLOBAL", "ops", "metrics"] {
        observer.join(&GroupName::from(group)).await.unwrap();
    }

    let config = SimulationConfig {
        shout_interval_ms: 5,
        seed: Some(seed),
        ..Default::default()
    };
    let mut peers = SimulatedPeers::spawn(&network, &config).await.unwrap();
    let shouts = collect_shouts(&mut events, 6).await;
    peers.stop().await.unwrap();
    shouts
}

#[tokio::test]
async fn test_seeded_chatter_is_reproducible() {
    let _ = tracing_subscriber::fmt::try_init();

    let first = run_seeded(42).await;
    let second = run_seeded(42).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_chatter_stays_within_configured_groups() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = SimulationConfig::default();
    for (name, group, payload) in run_seeded(7).await {
        let peer = config
            .peers
            .iter()
            .find(|peer| peer.name == name)
            .expect("only configured peers shout");
        assert!(peer.groups.contains(&group), "{} shouted into {}", name, group);
        assert!(peer.messages.contains(&payload));
    }
}

#[tokio::test]
async fn test_stopped_peers_leave_the_network() {
    let network = MemoryNetwork::new();
    let (observer, _events) = network.spawn_node("observer").unwrap();
    let mut peers = SimulatedPeers::spawn(&network, &SimulationConfig::default())
        .await
        .unwrap();
    assert_eq!(observer.peers().await.unwrap().len(), 3);

    peers.stop().await.unwrap();

    assert!(observer.peers().await.unwrap().is_empty());
    assert_eq!(network.node_count(), 1);
}
