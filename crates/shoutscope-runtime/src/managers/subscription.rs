//! Group subscription manager
//!
//! Turns watch filter transitions into overlay join/leave calls. The overlay
//! only delivers a group's shouts to its members, so watching a scope means
//! being a member of every group that scope broadcasts into.

use std::sync::Arc;

use shoutscope_core::{GroupName, Overlay, OverlayError, OverlayResult, PeerId};
use tracing::{debug, warn};

/// Outcome of a batch of joins or leaves
///
/// Every group is attempted even when an earlier one fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionReport {
    /// Groups the overlay accepted
    pub applied: Vec<GroupName>,
    /// Groups the overlay rejected, with the reason
    pub failed: Vec<(GroupName, OverlayError)>,
}

/// Issues membership changes on behalf of the watch task
#[derive(Clone)]
pub struct SubscriptionManager {
    overlay: Arc<dyn Overlay>,
}

impl SubscriptionManager {
    pub fn new(overlay: Arc<dyn Overlay>) -> Self {
        Self { overlay }
    }

    /// Join every group `peer_id` currently belongs to
    ///
    /// A peer that belongs to no group, or that the overlay does not know,
    /// produces an empty report.
    pub async fn watch_peer(&self, peer_id: &PeerId) -> OverlayResult<SubscriptionReport> {
        let groups = self.overlay.peer_groups(peer_id).await?;
        if groups.is_empty() {
            debug!("Peer {} belongs to no group, nothing to join", peer_id);
        }
        Ok(self.join_all(groups).await)
    }

    /// Join exactly one group
    pub async fn watch_group(&self, group: &GroupName) -> SubscriptionReport {
        self.join_all(vec![group.clone()]).await
    }

    /// Leave every group this node is a member of
    ///
    /// Memberships are only ever created by watching, so this undoes all of
    /// them at once.
    pub async fn clear_watch(&self) -> OverlayResult<SubscriptionReport> {
        let groups = self.overlay.own_groups().await?;
        let mut report = SubscriptionReport::default();
        for group in groups {
            match self.overlay.leave(&group).await {
                Ok(()) => report.applied.push(group),
                Err(e) => {
                    warn!("Failed to leave group {}: {}", group, e);
                    report.failed.push((group, e));
                }
            }
        }
        Ok(report)
    }

    async fn join_all(&self, groups: Vec<GroupName>) -> SubscriptionReport {
        let mut report = SubscriptionReport::default();
        for group in groups {
            match self.overlay.join(&group).await {
                Ok(()) => report.applied.push(group),
                Err(e) => {
                    warn!("Failed to join group {}: {}", group, e);
                    report.failed.push((group, e));
                }
            }
        }
        report
    }
}
