//! shoutscope Harness
//!
//! An in-memory overlay implementing `shoutscope_core::Overlay`, plus a
//! simulated peer population that generates shouts. Used by the runtime's
//! integration tests and by the CLI when no real overlay is wired in.

pub mod network;
pub mod simulation;

pub use network::{MemoryNetwork, MemoryNode};
pub use simulation::{SimulatedPeerConfig, SimulatedPeers, SimulationConfig};
