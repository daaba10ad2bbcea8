//! shoutscope Core
//!
//! Foundational types for the shoutscope broadcast inspector: the overlay
//! seam, the channel schema between the command loop and the watch task, the
//! watch filter state machine and the peer directory.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod channel;
pub mod config;
pub mod directory;
pub mod errors;
pub mod filter;
pub mod overlay;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use channel::{
    create_app_event_channel, create_command_channel, create_network_event_channel, AppEvent,
    AppEventReceiver, AppEventSender, Command, CommandReceiver, CommandSender, EventKind,
    NetworkEvent, NetworkEventReceiver, NetworkEventSender, WatchSnapshot, WatchStats,
};
pub use config::ChannelConfig;
pub use directory::PeerDirectory;
pub use errors::{OverlayError, Result, ShoutscopeError, ShoutscopeResult};
pub use filter::WatchFilter;
pub use overlay::{Overlay, OverlayResult};
pub use types::{GroupName, PeerId};
