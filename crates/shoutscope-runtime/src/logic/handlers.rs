//! Watch Task Command and Event Handlers
//!
//! Stateless functions over `WatchState`. Overlay membership changes go
//! through the `SubscriptionManager`; their failures are logged and never
//! bubble up, so a flaky overlay cannot stop the watch task.

use shoutscope_core::{AppEvent, GroupName, NetworkEvent, PeerId, WatchSnapshot};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::state::WatchState;
use crate::managers::{SubscriptionManager, SubscriptionReport};

/// Command and event handlers for the watch task
pub struct WatchHandlers;

impl WatchHandlers {
    /// Switch to watching one peer and join the groups it is in
    pub async fn handle_watch_peer(
        state: &mut WatchState,
        subscriptions: &SubscriptionManager,
        peer_id: PeerId,
    ) {
        info!("Watching peer {}", peer_id);
        state.filter.watch_peer(peer_id.clone());

        match subscriptions.watch_peer(&peer_id).await {
            Ok(report) => Self::record_joins(state, &report),
            Err(e) => warn!("Could not list groups of peer {}: {}", peer_id, e),
        }
    }

    /// Switch to watching one group and join it
    pub async fn handle_watch_group(
        state: &mut WatchState,
        subscriptions: &SubscriptionManager,
        group: GroupName,
    ) {
        info!("Watching group {}", group);
        state.filter.watch_group(group.clone());

        let report = subscriptions.watch_group(&group).await;
        Self::record_joins(state, &report);
    }

    /// Stop watching and leave every joined group
    pub async fn handle_clear_watch(state: &mut WatchState, subscriptions: &SubscriptionManager) {
        info!("Watch cleared");
        state.filter.clear();

        match subscriptions.clear_watch().await {
            Ok(report) => {
                state.stats.groups_left += report.applied.len() as u64;
                state.stats.subscription_failures += report.failed.len() as u64;
                debug!("Left {} group(s)", report.applied.len());
            }
            Err(e) => warn!("Could not list own groups: {}", e),
        }
    }

    /// Answer a snapshot request
    pub fn handle_snapshot(state: &WatchState, reply: oneshot::Sender<WatchSnapshot>) {
        // The requester may have given up waiting
        if reply.send(state.snapshot()).is_err() {
            debug!("Snapshot requester went away before the reply");
        }
    }

    /// Refresh the directory and decide whether a shout is surfaced
    pub fn handle_network_event(state: &mut WatchState, event: NetworkEvent) -> Option<AppEvent> {
        debug!("{} from {} ({})", event.kind(), event.peer_id(), event.name());
        state
            .directory
            .upsert(event.peer_id().clone(), event.name());

        let NetworkEvent::Shout {
            peer_id,
            name,
            group,
            payload,
        } = event
        else {
            return None;
        };

        if !state.filter.matches(&peer_id, &group) {
            state.stats.shouts_suppressed += 1;
            return None;
        }

        state.stats.shouts_observed += 1;
        Some(AppEvent::ShoutObserved {
            peer_id,
            name,
            group,
            payload,
        })
    }

    fn record_joins(state: &mut WatchState, report: &SubscriptionReport) {
        state.stats.groups_joined += report.applied.len() as u64;
        state.stats.subscription_failures += report.failed.len() as u64;
        debug!("Joined {} group(s)", report.applied.len());
    }
}
