//! Overlay Trait Definition
//!
//! The peer-to-peer overlay (discovery, membership gossip, transport) is an
//! external collaborator. This trait is the whole surface the inspector uses.
//! Concrete implementations live elsewhere; `shoutscope-harness` provides an
//! in-memory one.

use crate::errors::OverlayError;
use crate::types::{GroupName, PeerId};

pub type OverlayResult<T> = core::result::Result<T, OverlayError>;

// ----------------------------------------------------------------------------
// Overlay Trait
// ----------------------------------------------------------------------------

/// Handle to this node's membership in the overlay
///
/// Inbound events are not part of the trait: an implementation hands out a
/// `NetworkEventReceiver` when the node is created and the runtime passes it
/// to the watch task.
///
/// Membership changes made through `join` and `leave` are visible to every
/// other peer. Both are idempotent: joining a group this node already belongs
/// to, or leaving one it does not, succeeds without effect.
#[async_trait::async_trait]
pub trait Overlay: Send + Sync {
    /// Our own identifier on the overlay
    fn peer_id(&self) -> PeerId;

    /// Our own display name
    fn name(&self) -> String;

    /// Every peer currently connected, excluding ourselves
    async fn peers(&self) -> OverlayResult<Vec<PeerId>>;

    /// Every group that at least one remote peer belongs to
    async fn peer_groups_all(&self) -> OverlayResult<Vec<GroupName>>;

    /// Groups this node has joined
    async fn own_groups(&self) -> OverlayResult<Vec<GroupName>>;

    /// Remote members of a group, `None` if nobody is in it
    async fn peers_by_group(&self, group: &GroupName) -> OverlayResult<Option<Vec<PeerId>>>;

    /// Endpoint a peer is reachable at, `None` for unknown peers
    async fn peer_address(&self, peer_id: &PeerId) -> OverlayResult<Option<String>>;

    async fn join(&self, group: &GroupName) -> OverlayResult<()>;

    async fn leave(&self, group: &GroupName) -> OverlayResult<()>;

    /// Broadcast a payload to every other member of a group
    async fn shout(&self, group: &GroupName, payload: &str) -> OverlayResult<()>;

    /// Leave the overlay; other peers observe an exit
    async fn stop(&self) -> OverlayResult<()>;

    /// Groups a given peer currently belongs to
    ///
    /// Derived from the group list and per-group membership, so a peer that
    /// belongs to no group (or is unknown) yields an empty list.
    async fn peer_groups(&self, peer_id: &PeerId) -> OverlayResult<Vec<GroupName>> {
        let mut groups = Vec::new();
        for group in self.peer_groups_all().await? {
            let Some(members) = self.peers_by_group(&group).await? else {
                continue;
            };
            if members.iter().any(|member| member == peer_id) {
                groups.push(group);
            }
        }
        Ok(groups)
    }
}
