//! Command-line interface definitions and parsing

use clap::Parser;

/// Watch group broadcasts on a peer-to-peer overlay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Display name announced on the overlay (overrides node.name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Do not start the simulated peers
    #[arg(long)]
    pub no_simulation: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}
