//! In-memory overlay
//!
//! A `MemoryNetwork` is a shared bus that any number of `MemoryNode`s attach
//! to. It follows the group-broadcast overlay the inspector was written
//! against: nodes announce themselves on entry, membership changes are
//! gossiped to every other node, and a shout only reaches members of its
//! group.
//!
//! Events are pushed into unbounded channels while the state lock is held,
//! which keeps delivery order identical for every observer.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use shoutscope_core::{
    create_network_event_channel, GroupName, NetworkEvent, NetworkEventReceiver,
    NetworkEventSender, Overlay, OverlayError, OverlayResult, PeerId,
};
use tracing::{debug, trace};

/// First port handed out to in-memory endpoints
const FIRST_PORT: u16 = 49152;

/// Longest group name the overlay accepts, in bytes
const MAX_GROUP_NAME_LEN: usize = 255;

// ----------------------------------------------------------------------------
// Network State
// ----------------------------------------------------------------------------

#[derive(Debug)]
struct NodeEntry {
    name: String,
    address: String,
    groups: BTreeSet<GroupName>,
    events: NetworkEventSender,
}

#[derive(Debug)]
struct NetworkState {
    nodes: BTreeMap<PeerId, NodeEntry>,
    next_port: u16,
}

impl Default for NetworkState {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_port: FIRST_PORT,
        }
    }
}

impl NetworkState {
    /// Deliver an event to every node except `origin`
    fn gossip(&self, origin: &PeerId, event: &NetworkEvent) {
        for (peer_id, node) in &self.nodes {
            if peer_id != origin {
                deliver(peer_id, node, event.clone());
            }
        }
    }
}

fn deliver(peer_id: &PeerId, node: &NodeEntry, event: NetworkEvent) {
    if node.events.send(event).is_err() {
        trace!("Event receiver of {} dropped, discarding event", peer_id);
    }
}

// ----------------------------------------------------------------------------
// Memory Network
// ----------------------------------------------------------------------------

/// Shared in-process overlay bus
#[derive(Debug, Clone, Default)]
pub struct MemoryNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl MemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> OverlayResult<MutexGuard<'_, NetworkState>> {
        self.state.lock().map_err(|_| OverlayError::Unavailable {
            reason: "network state lock poisoned".to_string(),
        })
    }

    /// Attach a new node to the network
    ///
    /// The returned receiver yields every event addressed to the node,
    /// starting with an `Enter` (and the group `Join`s) of each node that was
    /// already attached.
    pub fn spawn_node(&self, name: impl Into<String>) -> OverlayResult<(MemoryNode, NetworkEventReceiver)> {
        let name = name.into();
        let peer_id = PeerId::new(uuid::Uuid::new_v4().to_string());
        let (events, receiver) = create_network_event_channel();

        let mut state = self.state()?;
        let address = format!("tcp://127.0.0.1:{}", state.next_port);
        state.next_port = state.next_port.wrapping_add(1).max(FIRST_PORT);

        let entry = NodeEntry {
            name: name.clone(),
            address: address.clone(),
            groups: BTreeSet::new(),
            events,
        };

        // Introduce the existing nodes to the newcomer
        for (existing_id, existing) in &state.nodes {
            deliver(
                &peer_id,
                &entry,
                NetworkEvent::Enter {
                    peer_id: existing_id.clone(),
                    name: existing.name.clone(),
                    address: existing.address.clone(),
                },
            );
            for group in &existing.groups {
                deliver(
                    &peer_id,
                    &entry,
                    NetworkEvent::Join {
                        peer_id: existing_id.clone(),
                        name: existing.name.clone(),
                        group: group.clone(),
                    },
                );
            }
        }

        state.gossip(
            &peer_id,
            &NetworkEvent::Enter {
                peer_id: peer_id.clone(),
                name: name.clone(),
                address,
            },
        );
        state.nodes.insert(peer_id.clone(), entry);
        debug!("Node {} ({}) attached to memory network", peer_id, name);

        let node = MemoryNode {
            peer_id,
            name,
            network: self.clone(),
            stopped: AtomicBool::new(false),
        };
        Ok((node, receiver))
    }

    /// Number of attached nodes
    pub fn node_count(&self) -> usize {
        self.state().map(|state| state.nodes.len()).unwrap_or(0)
    }
}

// ----------------------------------------------------------------------------
// Memory Node
// ----------------------------------------------------------------------------

/// One node attached to a `MemoryNetwork`
#[derive(Debug)]
pub struct MemoryNode {
    peer_id: PeerId,
    name: String,
    network: MemoryNetwork,
    stopped: AtomicBool,
}

impl MemoryNode {
    fn ensure_running(&self) -> OverlayResult<()> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(OverlayError::Shutdown);
        }
        Ok(())
    }

    /// Send a payload to a single peer
    pub fn whisper(&self, peer_id: &PeerId, payload: &str) -> OverlayResult<()> {
        self.ensure_running()?;
        let state = self.network.state()?;
        let target = state.nodes.get(peer_id).ok_or_else(|| OverlayError::PeerNotFound {
            peer_id: peer_id.to_string(),
        })?;
        deliver(
            peer_id,
            target,
            NetworkEvent::Whisper {
                peer_id: self.peer_id.clone(),
                name: self.name.clone(),
                payload: payload.to_string(),
            },
        );
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

#[async_trait::async_trait]
impl Overlay for MemoryNode {
    fn peer_id(&self) -> PeerId {
        self.peer_id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    async fn peers(&self) -> OverlayResult<Vec<PeerId>> {
        self.ensure_running()?;
        let state = self.network.state()?;
        Ok(state
            .nodes
            .keys()
            .filter(|id| **id != self.peer_id)
            .cloned()
            .collect())
    }

    async fn peer_groups_all(&self) -> OverlayResult<Vec<GroupName>> {
        self.ensure_running()?;
        let state = self.network.state()?;
        let groups: BTreeSet<GroupName> = state
            .nodes
            .iter()
            .filter(|(id, _)| **id != self.peer_id)
            .flat_map(|(_, node)| node.groups.iter().cloned())
            .collect();
        Ok(groups.into_iter().collect())
    }

    async fn own_groups(&self) -> OverlayResult<Vec<GroupName>> {
        self.ensure_running()?;
        let state = self.network.state()?;
        Ok(state
            .nodes
            .get(&self.peer_id)
            .map(|node| node.groups.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn peers_by_group(&self, group: &GroupName) -> OverlayResult<Option<Vec<PeerId>>> {
        self.ensure_running()?;
        let state = self.network.state()?;
        let members: Vec<PeerId> = state
            .nodes
            .iter()
            .filter(|(id, node)| **id != self.peer_id && node.groups.contains(group))
            .map(|(id, _)| id.clone())
            .collect();
        Ok((!members.is_empty()).then_some(members))
    }

    async fn peer_address(&self, peer_id: &PeerId) -> OverlayResult<Option<String>> {
        self.ensure_running()?;
        let state = self.network.state()?;
        Ok(state.nodes.get(peer_id).map(|node| node.address.clone()))
    }

    async fn join(&self, group: &GroupName) -> OverlayResult<()> {
        self.ensure_running()?;
        if group.is_empty() || group.len() > MAX_GROUP_NAME_LEN {
            return Err(OverlayError::InvalidGroupName {
                group: group.to_string(),
            });
        }
        let mut state = self.network.state()?;
        let node = state
            .nodes
            .get_mut(&self.peer_id)
            .ok_or(OverlayError::Shutdown)?;
        if !node.groups.insert(group.clone()) {
            return Ok(());
        }
        state.gossip(
            &self.peer_id,
            &NetworkEvent::Join {
                peer_id: self.peer_id.clone(),
                name: self.name.clone(),
                group: group.clone(),
            },
        );
        debug!("{} joined group {}", self.name, group);
        Ok(())
    }

    async fn leave(&self, group: &GroupName) -> OverlayResult<()> {
        self.ensure_running()?;
        let mut state = self.network.state()?;
        let node = state
            .nodes
            .get_mut(&self.peer_id)
            .ok_or(OverlayError::Shutdown)?;
        if !node.groups.remove(group) {
            return Ok(());
        }
        state.gossip(
            &self.peer_id,
            &NetworkEvent::Leave {
                peer_id: self.peer_id.clone(),
                name: self.name.clone(),
                group: group.clone(),
            },
        );
        debug!("{} left group {}", self.name, group);
        Ok(())
    }

    async fn shout(&self, group: &GroupName, payload: &str) -> OverlayResult<()> {
        self.ensure_running()?;
        let state = self.network.state()?;
        let event = NetworkEvent::Shout {
            peer_id: self.peer_id.clone(),
            name: self.name.clone(),
            group: group.clone(),
            payload: payload.to_string(),
        };
        for (peer_id, node) in &state.nodes {
            if *peer_id != self.peer_id && node.groups.contains(group) {
                deliver(peer_id, node, event.clone());
            }
        }
        Ok(())
    }

    async fn stop(&self) -> OverlayResult<()> {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let mut state = self.network.state()?;
        if state.nodes.remove(&self.peer_id).is_some() {
            state.gossip(
                &self.peer_id,
                &NetworkEvent::Exit {
                    peer_id: self.peer_id.clone(),
                    name: self.name.clone(),
                },
            );
        }
        debug!("Node {} ({}) detached from memory network", self.peer_id, self.name);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
