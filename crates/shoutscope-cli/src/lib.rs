//! shoutscope CLI library
//!
//! Components of the `shoutscope` binary: argument parsing, configuration,
//! the REPL and the wiring between the overlay and the watch runtime.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod terminal_interface;

pub use app::ShoutscopeApp;
pub use cli::Cli;
pub use commands::ReplCommand;
pub use config::{AppConfig, ConfigError};
pub use error::{CliError, Result};
pub use terminal_interface::{format_shout, Flow, TerminalInterface};
