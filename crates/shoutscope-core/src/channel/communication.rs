//! Channel Communication Protocol Types
//!
//! All traffic into and out of the watch task flows through these message
//! types. Both inbound enums are closed, so dispatch is an exhaustive `match`
//! and an unrecognised command cannot exist at runtime.

use core::fmt;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::directory::PeerDirectory;
use crate::filter::WatchFilter;
use crate::types::{GroupName, PeerId};

// ----------------------------------------------------------------------------
// Command: Command Interface → Watch Task
// ----------------------------------------------------------------------------

/// Control commands sent from the operator-facing command loop
#[derive(Debug)]
pub enum Command {
    /// Watch every shout sent by one peer, joining the groups it belongs to
    WatchPeer { peer_id: PeerId },
    /// Watch every shout sent to one group, joining it
    WatchGroup { group: GroupName },
    /// Stop watching and leave every joined group
    ClearWatch,
    /// Stop the watch task after the current message
    Shutdown,
    /// Request a read-only copy of the watch task's state
    Snapshot { reply: oneshot::Sender<WatchSnapshot> },
}

impl Command {
    /// Short label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Command::WatchPeer { .. } => "watch-peer",
            Command::WatchGroup { .. } => "watch-group",
            Command::ClearWatch => "clear-watch",
            Command::Shutdown => "shutdown",
            Command::Snapshot { .. } => "snapshot",
        }
    }
}

// ----------------------------------------------------------------------------
// NetworkEvent: Overlay → Watch Task
// ----------------------------------------------------------------------------

/// Events delivered by the overlay to this node
///
/// Every variant carries the sender's id and current display name. Only
/// `Shout` can be surfaced to the operator; the rest just keep the peer
/// directory current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkEvent {
    /// A peer appeared on the overlay
    Enter {
        peer_id: PeerId,
        name: String,
        address: String,
    },
    /// A peer left the overlay
    Exit { peer_id: PeerId, name: String },
    /// A peer joined a group
    Join {
        peer_id: PeerId,
        name: String,
        group: GroupName,
    },
    /// A peer left a group
    Leave {
        peer_id: PeerId,
        name: String,
        group: GroupName,
    },
    /// A message sent directly to this node
    Whisper {
        peer_id: PeerId,
        name: String,
        payload: String,
    },
    /// A message broadcast to a group this node belongs to
    Shout {
        peer_id: PeerId,
        name: String,
        group: GroupName,
        payload: String,
    },
}

impl NetworkEvent {
    /// Id of the peer that caused the event
    pub fn peer_id(&self) -> &PeerId {
        match self {
            NetworkEvent::Enter { peer_id, .. }
            | NetworkEvent::Exit { peer_id, .. }
            | NetworkEvent::Join { peer_id, .. }
            | NetworkEvent::Leave { peer_id, .. }
            | NetworkEvent::Whisper { peer_id, .. }
            | NetworkEvent::Shout { peer_id, .. } => peer_id,
        }
    }

    /// Display name the peer announced with this event
    pub fn name(&self) -> &str {
        match self {
            NetworkEvent::Enter { name, .. }
            | NetworkEvent::Exit { name, .. }
            | NetworkEvent::Join { name, .. }
            | NetworkEvent::Leave { name, .. }
            | NetworkEvent::Whisper { name, .. }
            | NetworkEvent::Shout { name, .. } => name,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            NetworkEvent::Enter { .. } => EventKind::Enter,
            NetworkEvent::Exit { .. } => EventKind::Exit,
            NetworkEvent::Join { .. } => EventKind::Join,
            NetworkEvent::Leave { .. } => EventKind::Leave,
            NetworkEvent::Whisper { .. } => EventKind::Whisper,
            NetworkEvent::Shout { .. } => EventKind::Shout,
        }
    }
}

/// Discriminant of a `NetworkEvent`, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Enter,
    Exit,
    Join,
    Leave,
    Whisper,
    Shout,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Enter => write!(f, "ENTER"),
            EventKind::Exit => write!(f, "EXIT"),
            EventKind::Join => write!(f, "JOIN"),
            EventKind::Leave => write!(f, "LEAVE"),
            EventKind::Whisper => write!(f, "WHISPER"),
            EventKind::Shout => write!(f, "SHOUT"),
        }
    }
}

// ----------------------------------------------------------------------------
// AppEvent: Watch Task → Operator
// ----------------------------------------------------------------------------

/// Output of the watch task towards the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppEvent {
    /// A shout passed the current watch filter
    ShoutObserved {
        peer_id: PeerId,
        name: String,
        group: GroupName,
        payload: String,
    },
}

// ----------------------------------------------------------------------------
// Snapshot
// ----------------------------------------------------------------------------

/// Counters kept by the watch task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchStats {
    pub commands_processed: u64,
    pub events_processed: u64,
    pub shouts_observed: u64,
    pub shouts_suppressed: u64,
    pub groups_joined: u64,
    pub groups_left: u64,
    /// Joins and leaves the overlay rejected
    pub subscription_failures: u64,
}

/// Copy of the watch task's state, answered over `Command::Snapshot`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSnapshot {
    pub filter: WatchFilter,
    pub directory: PeerDirectory,
    pub stats: WatchStats,
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
