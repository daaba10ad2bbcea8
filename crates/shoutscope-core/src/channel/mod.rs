//! Channel Module
//!
//! Message-passing infrastructure between the command loop, the overlay and
//! the watch task:
//! - `communication`: commands, network events, app events and snapshots
//! - `utils`: channel aliases and constructors

pub mod communication;
pub mod utils;

pub use communication::{AppEvent, Command, EventKind, NetworkEvent, WatchSnapshot, WatchStats};

pub use crate::config::ChannelConfig;

pub use utils::{
    create_app_event_channel, create_command_channel, create_network_event_channel,
    AppEventReceiver, AppEventSender, CommandReceiver, CommandSender, NetworkEventReceiver,
    NetworkEventSender,
};
