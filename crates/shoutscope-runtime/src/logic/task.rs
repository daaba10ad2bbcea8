//! Watch Task Implementation
//!
//! Contains the WatchTask struct and its event multiplexing loop.

use std::sync::Arc;

use shoutscope_core::{
    AppEvent, AppEventSender, Command, CommandReceiver, NetworkEvent, NetworkEventReceiver,
    Overlay, ShoutscopeError, ShoutscopeResult, WatchStats,
};
use tracing::{debug, error, info, warn};

use super::handlers::WatchHandlers;
use super::state::WatchState;
use crate::managers::SubscriptionManager;

// ----------------------------------------------------------------------------
// Watch Task
// ----------------------------------------------------------------------------

/// The task that owns the watch filter and peer directory
///
/// Commands and network events are handled one at a time, each to
/// completion, in the order `select!` picks them up.
pub struct WatchTask {
    state: WatchState,
    subscriptions: SubscriptionManager,
    /// Channel for receiving commands from the command interface
    command_receiver: CommandReceiver,
    /// Channel for receiving events from the overlay
    event_receiver: NetworkEventReceiver,
    /// Channel for sending observed shouts to the operator
    app_event_sender: AppEventSender,
    running: bool,
}

impl WatchTask {
    pub fn new(
        overlay: Arc<dyn Overlay>,
        command_receiver: CommandReceiver,
        event_receiver: NetworkEventReceiver,
        app_event_sender: AppEventSender,
    ) -> Self {
        Self {
            state: WatchState::new(),
            subscriptions: SubscriptionManager::new(overlay),
            command_receiver,
            event_receiver,
            app_event_sender,
            running: true,
        }
    }

    /// Run the multiplexing loop until shutdown
    ///
    /// Ends cleanly on `Command::Shutdown`, when every command sender is
    /// dropped, or when the overlay closes the event channel. Ends with an
    /// error when observed shouts can no longer be delivered.
    pub async fn run(&mut self) -> ShoutscopeResult<()> {
        info!("Watch task starting");

        while self.running {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(cmd) => {
                            debug!("Received command {}", cmd.label());
                            if let Err(e) = self.process_command(cmd).await {
                                if e.is_unrecoverable() {
                                    error!("Unrecoverable error processing command, shutting down watch task: {}", e);
                                    self.running = false;
                                    return Err(e);
                                }
                                warn!("Error processing command: {}", e);
                            }
                        }
                        None => {
                            info!("Command channel closed, shutting down");
                            break;
                        }
                    }
                }

                event = self.event_receiver.recv() => {
                    match event {
                        Some(evt) => {
                            if let Err(e) = self.process_event(evt).await {
                                if e.is_unrecoverable() {
                                    error!("Unrecoverable error processing event, shutting down watch task: {}", e);
                                    self.running = false;
                                    return Err(e);
                                }
                                warn!("Error processing event: {}", e);
                            }
                        }
                        None => {
                            info!("Overlay event channel closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        self.running = false;
        info!("Watch task stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stats(&self) -> &WatchStats {
        &self.state.stats
    }

    async fn process_command(&mut self, command: Command) -> ShoutscopeResult<()> {
        self.state.stats.commands_processed += 1;

        match command {
            Command::WatchPeer { peer_id } => {
                WatchHandlers::handle_watch_peer(&mut self.state, &self.subscriptions, peer_id).await
            }
            Command::WatchGroup { group } => {
                WatchHandlers::handle_watch_group(&mut self.state, &self.subscriptions, group).await
            }
            Command::ClearWatch => {
                WatchHandlers::handle_clear_watch(&mut self.state, &self.subscriptions).await
            }
            Command::Snapshot { reply } => WatchHandlers::handle_snapshot(&self.state, reply),
            Command::Shutdown => {
                info!("Shutdown requested");
                self.running = false;
            }
        }

        Ok(())
    }

    async fn process_event(&mut self, event: NetworkEvent) -> ShoutscopeResult<()> {
        self.state.stats.events_processed += 1;

        if let Some(app_event) = WatchHandlers::handle_network_event(&mut self.state, event) {
            self.send_app_event(app_event).await?;
        }
        Ok(())
    }

    /// Send app event to the operator
    async fn send_app_event(&mut self, app_event: AppEvent) -> ShoutscopeResult<()> {
        self.app_event_sender
            .send(app_event)
            .await
            .map_err(|_| ShoutscopeError::channel_error("app event channel closed"))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
