//! Watch Task State
//!
//! Everything the watch task owns. Nothing outside the task holds a reference
//! to it; readers get a `WatchSnapshot` copy instead.

use shoutscope_core::{PeerDirectory, WatchFilter, WatchSnapshot, WatchStats};

// ----------------------------------------------------------------------------
// Watch State
// ----------------------------------------------------------------------------

/// State owned by the watch task
#[derive(Debug, Default)]
pub struct WatchState {
    /// Scope whose shouts are surfaced
    pub filter: WatchFilter,
    /// Peer id to display name cache, fed by every inbound event
    pub directory: PeerDirectory,
    pub stats: WatchStats,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the current state for a reader outside the task
    pub fn snapshot(&self) -> WatchSnapshot {
        WatchSnapshot {
            filter: self.filter.clone(),
            directory: self.directory.clone(),
            stats: self.stats.clone(),
        }
    }
}
