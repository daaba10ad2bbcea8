//! Channel Utilities
//!
//! Type aliases and constructors for the three channels around the watch
//! task. Commands and app events are bounded; network events are unbounded
//! because the overlay delivers them from synchronous call sites and must
//! never block on a slow consumer.

use crate::channel::communication::{AppEvent, Command, NetworkEvent};
use crate::config::ChannelConfig;

pub type CommandSender = tokio::sync::mpsc::Sender<Command>;
pub type CommandReceiver = tokio::sync::mpsc::Receiver<Command>;
pub type NetworkEventSender = tokio::sync::mpsc::UnboundedSender<NetworkEvent>;
pub type NetworkEventReceiver = tokio::sync::mpsc::UnboundedReceiver<NetworkEvent>;
pub type AppEventSender = tokio::sync::mpsc::Sender<AppEvent>;
pub type AppEventReceiver = tokio::sync::mpsc::Receiver<AppEvent>;

// ----------------------------------------------------------------------------
// Channel Creation Utilities
// ----------------------------------------------------------------------------

/// Create bounded command channel (Command Interface → Watch Task)
pub fn create_command_channel(config: &ChannelConfig) -> (CommandSender, CommandReceiver) {
    tokio::sync::mpsc::channel(config.command_buffer_size)
}

/// Create unbounded network event channel (Overlay → Watch Task)
pub fn create_network_event_channel() -> (NetworkEventSender, NetworkEventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Create bounded app event channel (Watch Task → Operator)
pub fn create_app_event_channel(config: &ChannelConfig) -> (AppEventSender, AppEventReceiver) {
    tokio::sync::mpsc::channel(config.app_event_buffer_size)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
