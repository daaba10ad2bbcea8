//! shoutscope Runtime Engine
//!
//! This crate contains the runtime side of the inspector:
//! - `WatchTask`: the single task that multiplexes operator commands and
//!   overlay events, owns the watch filter and the peer directory, and
//!   relays matching shouts
//! - `SubscriptionManager`: translates watch changes into overlay joins and
//!   leaves
//! - `RuntimeBuilder` / `WatchHandle`: spawn the task and talk to it
//!
//! `shoutscope-core` provides the types and the overlay seam; this crate is
//! the engine around them.

pub mod builder;
pub mod logic;
pub mod managers;

#[cfg(test)]
mod test_support;

pub use builder::{RuntimeBuilder, WatchHandle};
pub use logic::{WatchHandlers, WatchState, WatchTask};
pub use managers::{SubscriptionManager, SubscriptionReport};

// Re-export core types for convenience
pub use shoutscope_core::{
    AppEvent, AppEventReceiver, ChannelConfig, Command, CommandSender, GroupName, NetworkEvent,
    NetworkEventReceiver, Overlay, PeerId, ShoutscopeError, ShoutscopeResult, WatchFilter,
    WatchSnapshot, WatchStats,
};
