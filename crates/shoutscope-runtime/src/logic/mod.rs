//! Watch Logic Module
//!
//! The watch task split into focused components:
//! - `state`: filter, peer directory and counters owned by the task
//! - `handlers`: command and event handlers
//! - `task`: the `WatchTask` multiplexing loop
//!
//! All state is serialized through the single `WatchTask`. The command
//! interface never touches it directly; it asks for a `WatchSnapshot` over
//! the command channel, so no lock guards the directory.

pub mod handlers;
pub mod state;
pub mod task;

pub use handlers::WatchHandlers;
pub use state::WatchState;
pub use task::WatchTask;
