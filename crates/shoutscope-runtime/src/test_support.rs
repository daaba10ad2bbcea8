//! Scripted overlay for unit tests

use std::sync::Mutex;

use async_trait::async_trait;
use shoutscope_core::{GroupName, Overlay, OverlayError, OverlayResult, PeerId};

/// Overlay with fixed remote memberships that records every join and leave
pub struct RecordingOverlay {
    members: Vec<(PeerId, GroupName)>,
    failing_joins: Vec<GroupName>,
    own: Mutex<Vec<GroupName>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingOverlay {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            failing_joins: Vec::new(),
            own: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a remote peer to a group
    pub fn with_member(mut self, peer: &str, group: &str) -> Self {
        self.members.push((PeerId::from(peer), GroupName::from(group)));
        self
    }

    /// Make every join of `group` fail
    pub fn failing_join(mut self, group: &str) -> Self {
        self.failing_joins.push(GroupName::from(group));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn own_groups_now(&self) -> Vec<GroupName> {
        self.own.lock().unwrap().clone()
    }
}

#[async_trait]
impl Overlay for RecordingOverlay {
    fn peer_id(&self) -> PeerId {
        PeerId::from("self")
    }

    fn name(&self) -> String {
        "observer".to_string()
    }

    async fn peers(&self) -> OverlayResult<Vec<PeerId>> {
        let mut peers: Vec<PeerId> = Vec::new();
        for (peer, _) in &self.members {
            if !peers.contains(peer) {
                peers.push(peer.clone());
            }
        }
        Ok(peers)
    }

    async fn peer_groups_all(&self) -> OverlayResult<Vec<GroupName>> {
        let mut groups: Vec<GroupName> = Vec::new();
        for (_, group) in &self.members {
            if !groups.contains(group) {
                groups.push(group.clone());
            }
        }
        Ok(groups)
    }

    async fn own_groups(&self) -> OverlayResult<Vec<GroupName>> {
        Ok(self.own_groups_now())
    }

    async fn peers_by_group(&self, group: &GroupName) -> OverlayResult<Option<Vec<PeerId>>> {
        let peers: Vec<PeerId> = self
            .members
            .iter()
            .filter(|(_, g)| g == group)
            .map(|(peer, _)| peer.clone())
            .collect();
        Ok(if peers.is_empty() { None } else { Some(peers) })
    }

    async fn peer_address(&self, peer_id: &PeerId) -> OverlayResult<Option<String>> {
        Ok(self
            .members
            .iter()
            .any(|(peer, _)| peer == peer_id)
            .then(|| format!("tcp://{}", peer_id)))
    }

    async fn join(&self, group: &GroupName) -> OverlayResult<()> {
        self.calls.lock().unwrap().push(format!("join {}", group));
        if self.failing_joins.contains(group) {
            return Err(OverlayError::Unavailable {
                reason: format!("join of {} refused", group),
            });
        }
        let mut own = self.own.lock().unwrap();
        if !own.contains(group) {
            own.push(group.clone());
        }
        Ok(())
    }

    async fn leave(&self, group: &GroupName) -> OverlayResult<()> {
        self.calls.lock().unwrap().push(format!("leave {}", group));
        self.own.lock().unwrap().retain(|g| g != group);
        Ok(())
    }

    async fn shout(&self, group: &GroupName, payload: &str) -> OverlayResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("shout {} {}", group, payload));
        Ok(())
    }

    async fn stop(&self) -> OverlayResult<()> {
        self.calls.lock().unwrap().push("stop".to_string());
        Ok(())
    }
}
