//! Simulated peers
//!
//! Populates a `MemoryNetwork` with scripted peers that periodically shout
//! into their groups, so the inspector has traffic to watch without a real
//! overlay.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shoutscope_core::{GroupName, Overlay, OverlayResult, ShoutscopeError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::network::{MemoryNetwork, MemoryNode};

// ----------------------------------------------------------------------------
// Configuration
// ----------------------------------------------------------------------------

/// One scripted peer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedPeerConfig {
    /// Display name announced to the network
    pub name: String,
    /// Groups joined on startup
    #[serde(default)]
    pub groups: Vec<String>,
    /// Payloads this peer picks from when shouting
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Settings for the chatter generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Delay between two shouts, in milliseconds
    pub shout_interval_ms: u64,
    /// Seed for peer and message selection; random when unset
    pub seed: Option<u64>,
    pub peers: Vec<SimulatedPeerConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            shout_interval_ms: 2000,
            seed: None,
            peers: vec![
                SimulatedPeerConfig {
                    name: "alice".to_string(),
                    groups: vec!["GLOBAL".to_string(), "ops".to_string()],
                    messages: vec![
                        "disk usage at 71%".to_string(),
                        "deploy finished".to_string(),
                    ],
                },
                SimulatedPeerConfig {
                    name: "bob".to_string(),
                    groups: vec!["GLOBAL".to_string()],
                    messages: vec!["hello everyone".to_string(), "anyone there?".to_string()],
                },
                SimulatedPeerConfig {
                    name: "carol".to_string(),
                    groups: vec!["ops".to_string(), "metrics".to_string()],
                    messages: vec!["cpu=0.42".to_string(), "rss=118MB".to_string()],
                },
            ],
        }
    }
}

impl SimulationConfig {
    pub fn shout_interval(&self) -> Duration {
        Duration::from_millis(self.shout_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ShoutscopeError> {
        if self.shout_interval_ms == 0 {
            return Err(ShoutscopeError::config_error(
                "simulation.shout_interval_ms must be greater than zero",
            ));
        }
        if let Some(peer) = self.peers.iter().find(|peer| peer.name.trim().is_empty()) {
            return Err(ShoutscopeError::config_error(format!(
                "simulated peer with groups {:?} has an empty name",
                peer.groups
            )));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Simulated Peers
// ----------------------------------------------------------------------------

struct Speaker {
    node: Arc<MemoryNode>,
    groups: Vec<GroupName>,
    messages: Vec<String>,
}

impl Speaker {
    /// Attach one configured peer and join its groups
    ///
    /// The node is detached again when a join fails.
    async fn attach(network: &MemoryNetwork, peer: &SimulatedPeerConfig) -> OverlayResult<Self> {
        // Simulated peers ignore what they receive
        let (node, _events) = network.spawn_node(peer.name.clone())?;
        let groups: Vec<GroupName> = peer
            .groups
            .iter()
            .map(|group| GroupName::new(group.clone()))
            .collect();
        for group in &groups {
            if let Err(e) = node.join(group).await {
                if let Err(stop_err) = node.stop().await {
                    debug!("Could not detach {}: {}", peer.name, stop_err);
                }
                return Err(e);
            }
        }
        Ok(Self {
            node: Arc::new(node),
            groups,
            messages: peer.messages.clone(),
        })
    }

    fn can_speak(&self) -> bool {
        !self.groups.is_empty() && !self.messages.is_empty()
    }
}

/// Running set of scripted peers
pub struct SimulatedPeers {
    nodes: Vec<Arc<MemoryNode>>,
    chatter: Option<JoinHandle<()>>,
}

impl SimulatedPeers {
    /// Attach the configured peers to `network`, join their groups and start
    /// the chatter task
    pub async fn spawn(network: &MemoryNetwork, config: &SimulationConfig) -> OverlayResult<Self> {
        let mut speakers: Vec<Speaker> = Vec::with_capacity(config.peers.len());
        for peer in &config.peers {
            match Speaker::attach(network, peer).await {
                Ok(speaker) => speakers.push(speaker),
                Err(e) => {
                    warn!("Simulated peer {} failed to start: {}", peer.name, e);
                    for speaker in &speakers {
                        if let Err(stop_err) = speaker.node.stop().await {
                            debug!("Could not detach {}: {}", speaker.node.name(), stop_err);
                        }
                    }
                    return Err(e);
                }
            }
        }

        let nodes = speakers.iter().map(|speaker| speaker.node.clone()).collect();
        info!("Spawned {} simulated peers", speakers.len());

        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let chatter = tokio::spawn(run_chatter(speakers, config.shout_interval(), rng));

        Ok(Self {
            nodes,
            chatter: Some(chatter),
        })
    }

    /// Nodes backing the simulated peers, in configuration order
    pub fn nodes(&self) -> &[Arc<MemoryNode>] {
        &self.nodes
    }

    /// Stop the chatter task and detach every simulated peer
    pub async fn stop(&mut self) -> OverlayResult<()> {
        if let Some(chatter) = self.chatter.take() {
            chatter.abort();
        }
        for node in &self.nodes {
            node.stop().await?;
        }
        Ok(())
    }
}

impl Drop for SimulatedPeers {
    fn drop(&mut self) {
        if let Some(chatter) = self.chatter.take() {
            chatter.abort();
        }
    }
}

async fn run_chatter(speakers: Vec<Speaker>, period: Duration, mut rng: fastrand::Rng) {
    let speakers: Vec<Speaker> = speakers.into_iter().filter(Speaker::can_speak).collect();
    if speakers.is_empty() {
        debug!("No simulated peer has both groups and messages, chatter disabled");
        return;
    }

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // First tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let speaker = &speakers[rng.usize(..speakers.len())];
        let group = &speaker.groups[rng.usize(..speaker.groups.len())];
        let message = &speaker.messages[rng.usize(..speaker.messages.len())];

        if let Err(e) = speaker.node.shout(group, message).await {
            warn!("Simulated peer {} failed to shout: {}", speaker.node.name(), e);
            return;
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use shoutscope_core::{NetworkEvent, OverlayError};

    fn quiet_config(interval_ms: u64) -> SimulationConfig {
        SimulationConfig {
            shout_interval_ms: interval_ms,
            seed: Some(7),
            peers: vec![SimulatedPeerConfig {
                name: "alice".to_string(),
                groups: vec!["G1".to_string()],
                messages: vec!["hi".to_string()],
            }],
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(quiet_config(0).validate().is_err());
    }

    #[tokio::test]
    async fn test_spawned_peers_join_their_groups() {
        let network = MemoryNetwork::new();
        let (observer, _rx) = network.spawn_node("observer").unwrap();
        let mut peers = SimulatedPeers::spawn(&network, &quiet_config(60_000)).await.unwrap();

        assert_eq!(peers.nodes().len(), 1);
        assert_eq!(
            observer.peer_groups_all().await.unwrap(),
            vec![GroupName::from("G1")]
        );

        peers.stop().await.unwrap();
        assert!(observer.peers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_join_detaches_every_spawned_peer() {
        let network = MemoryNetwork::new();
        let (observer, _rx) = network.spawn_node("observer").unwrap();
        let mut config = quiet_config(60_000);
        config.peers.push(SimulatedPeerConfig {
            name: "bob".to_string(),
            groups: vec!["G2".to_string(), String::new()],
            messages: vec!["yo".to_string()],
        });

        let result = SimulatedPeers::spawn(&network, &config).await;

        assert!(matches!(result, Err(OverlayError::InvalidGroupName { .. })));
        assert_eq!(network.node_count(), 1);
        assert!(observer.peers().await.unwrap().is_empty());
        assert!(observer.peer_groups_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chatter_reaches_group_members() {
        let network = MemoryNetwork::new();
        let (observer, mut rx) = network.spawn_node("observer").unwrap();
        observer.join(&GroupName::from("G1")).await.unwrap();
        let mut peers = SimulatedPeers::spawn(&network, &quiet_config(10)).await.unwrap();

        let shout = tokio::time::timeout(Duration::from_secs(2), async {
            while let Some(event) = rx.recv().await {
                if let NetworkEvent::Shout { payload, name, .. } = event {
                    return Some((name, payload));
                }
            }
            None
        })
        .await
        .expect("a shout should arrive within the timeout");

        assert_eq!(shout, Some(("alice".to_string(), "hi".to_string())));
        peers.stop().await.unwrap();
    }
}
