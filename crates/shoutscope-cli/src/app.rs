//! Application wiring
//!
//! Builds the in-memory overlay, the optional simulated peers and the watch
//! runtime, then hands the terminal to the REPL. Observed shouts are printed
//! by a separate task so they appear while the REPL waits for input.

use std::sync::Arc;

use shoutscope_core::{AppEventReceiver, Overlay};
use shoutscope_harness::{MemoryNetwork, SimulatedPeers};
use shoutscope_runtime::{RuntimeBuilder, WatchHandle};
use tokio::io::BufReader;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::terminal_interface::{format_shout, TerminalInterface};

/// A running inspector
pub struct ShoutscopeApp {
    config: AppConfig,
    handle: WatchHandle,
    simulation: Option<SimulatedPeers>,
    printer: Option<JoinHandle<()>>,
}

impl ShoutscopeApp {
    /// Attach to a fresh in-memory overlay and start the watch runtime
    pub async fn start(config: AppConfig, simulate: bool) -> Result<Self> {
        let network = MemoryNetwork::new();
        let (node, events) = network.spawn_node(config.node.name.clone())?;
        info!("Starting {} as {}", node.name(), node.peer_id());

        let simulation = if simulate {
            Some(SimulatedPeers::spawn(&network, &config.simulation).await?)
        } else {
            info!("Simulation disabled, the overlay has no other peers");
            None
        };

        let mut handle = RuntimeBuilder::new(Arc::new(node), events)
            .channel_config(config.channels.clone())
            .start()?;
        let printer = handle
            .take_app_event_receiver()
            .map(|app_events| spawn_printer(app_events, config.cli.show_sender));

        // Let the directory fill before the first prompt
        tokio::time::sleep(config.cli.startup_delay()).await;

        Ok(Self {
            config,
            handle,
            simulation,
            printer,
        })
    }

    pub fn handle(&self) -> &WatchHandle {
        &self.handle
    }

    /// Run the REPL on stdin until the operator exits
    pub async fn run_interactive(&self) -> Result<()> {
        let mut interface = TerminalInterface::new(&self.handle, self.config.cli.prompt.clone());
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        let mut stderr = std::io::stderr();
        interface.run(stdin, &mut stdout, &mut stderr).await
    }

    /// Stop the watch task, leave the overlay and stop the simulated peers
    pub async fn stop(mut self) -> Result<()> {
        let shutdown = self.handle.shutdown().await;

        if let Err(e) = self.handle.overlay().stop().await {
            warn!("Failed to leave the overlay: {}", e);
        }
        if let Some(mut simulation) = self.simulation.take() {
            if let Err(e) = simulation.stop().await {
                warn!("Failed to stop simulated peers: {}", e);
            }
        }
        // The printer ends once the watch task drops its sender
        if let Some(printer) = self.printer.take() {
            let _ = printer.await;
        }

        info!("shoutscope stopped");
        shutdown.map_err(Into::into)
    }
}

fn spawn_printer(mut app_events: AppEventReceiver, show_sender: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = app_events.recv().await {
            println!("{}", format_shout(&event, show_sender));
        }
        debug!("App event channel closed, printer stopping");
    })
}
