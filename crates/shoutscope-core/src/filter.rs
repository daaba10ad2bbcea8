//! Watch filter state machine
//!
//! Three states, no timeouts and no terminal state. Any state can move to any
//! other on an operator command; the previous scope is always replaced, never
//! combined.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::types::{GroupName, PeerId};

/// What the operator is currently watching
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchFilter {
    /// Nothing is surfaced
    #[default]
    Inactive,
    /// Shouts sent by this peer, in any group
    Peer(PeerId),
    /// Shouts sent to this group, by any peer
    Group(GroupName),
}

impl WatchFilter {
    pub fn watch_peer(&mut self, peer_id: PeerId) {
        *self = WatchFilter::Peer(peer_id);
    }

    pub fn watch_group(&mut self, group: GroupName) {
        *self = WatchFilter::Group(group);
    }

    pub fn clear(&mut self) {
        *self = WatchFilter::Inactive;
    }

    /// Whether a shout from `sender` into `group` should be surfaced
    pub fn matches(&self, sender: &PeerId, group: &GroupName) -> bool {
        match self {
            WatchFilter::Inactive => false,
            WatchFilter::Peer(watched) => watched == sender,
            WatchFilter::Group(watched) => watched == group,
        }
    }
}

impl fmt::Display for WatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchFilter::Inactive => write!(f, "not watching"),
            WatchFilter::Peer(peer_id) => write!(f, "watching peer {}", peer_id),
            WatchFilter::Group(group) => write!(f, "watching group {}", group),
        }
    }
}
