//! Runtime Builder API
//!
//! Wires an overlay node to a freshly spawned `WatchTask` and hands back a
//! `WatchHandle` for the command interface.

use std::sync::Arc;
use std::time::Duration;

use shoutscope_core::{
    create_app_event_channel, create_command_channel, AppEventReceiver, ChannelConfig, Command,
    CommandSender, GroupName, NetworkEventReceiver, Overlay, PeerId, ShoutscopeError,
    ShoutscopeResult, WatchSnapshot,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::logic::WatchTask;

/// Upper bound on how long `shutdown` waits for the task to wind down
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

// ----------------------------------------------------------------------------
// Runtime Builder
// ----------------------------------------------------------------------------

/// Builder for a watch runtime bound to one overlay node
pub struct RuntimeBuilder {
    overlay: Arc<dyn Overlay>,
    events: NetworkEventReceiver,
    channel_config: ChannelConfig,
}

impl RuntimeBuilder {
    /// `events` must be the receiver handed out with `overlay`
    pub fn new(overlay: Arc<dyn Overlay>, events: NetworkEventReceiver) -> Self {
        Self {
            overlay,
            events,
            channel_config: ChannelConfig::default(),
        }
    }

    pub fn channel_config(mut self, config: ChannelConfig) -> Self {
        self.channel_config = config;
        self
    }

    /// Spawn the watch task on the current tokio runtime
    pub fn start(self) -> ShoutscopeResult<WatchHandle> {
        self.channel_config.validate()?;

        let (command_sender, command_receiver) = create_command_channel(&self.channel_config);
        let (app_event_sender, app_event_receiver) =
            create_app_event_channel(&self.channel_config);

        let mut task = WatchTask::new(
            self.overlay.clone(),
            command_receiver,
            self.events,
            app_event_sender,
        );
        let task_handle = tokio::spawn(async move { task.run().await });

        info!(
            "Watch runtime started for {} ({})",
            self.overlay.name(),
            self.overlay.peer_id()
        );

        Ok(WatchHandle {
            overlay: self.overlay,
            command_sender,
            app_event_receiver: Some(app_event_receiver),
            task_handle: Some(task_handle),
        })
    }
}

// ----------------------------------------------------------------------------
// Watch Handle
// ----------------------------------------------------------------------------

/// Handle to a running watch task
pub struct WatchHandle {
    overlay: Arc<dyn Overlay>,
    command_sender: CommandSender,
    app_event_receiver: Option<AppEventReceiver>,
    task_handle: Option<JoinHandle<ShoutscopeResult<()>>>,
}

impl WatchHandle {
    /// Overlay node the task is attached to, for read-only queries
    pub fn overlay(&self) -> &Arc<dyn Overlay> {
        &self.overlay
    }

    /// Take the app event receiver (can only be called once)
    pub fn take_app_event_receiver(&mut self) -> Option<AppEventReceiver> {
        self.app_event_receiver.take()
    }

    /// Send a command to the watch task, waiting for buffer space
    pub async fn send_command(&self, command: Command) -> ShoutscopeResult<()> {
        self.command_sender
            .send(command)
            .await
            .map_err(|_| ShoutscopeError::channel_error("watch task is not running"))
    }

    pub async fn watch_peer(&self, peer_id: PeerId) -> ShoutscopeResult<()> {
        self.send_command(Command::WatchPeer { peer_id }).await
    }

    pub async fn watch_group(&self, group: GroupName) -> ShoutscopeResult<()> {
        self.send_command(Command::WatchGroup { group }).await
    }

    pub async fn clear_watch(&self) -> ShoutscopeResult<()> {
        self.send_command(Command::ClearWatch).await
    }

    /// Current filter, directory and counters
    ///
    /// Answered after every command queued before it, so it reflects them.
    pub async fn snapshot(&self) -> ShoutscopeResult<WatchSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send_command(Command::Snapshot { reply }).await?;
        response
            .await
            .map_err(|_| ShoutscopeError::channel_error("watch task stopped before replying"))
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the watch task to end on its own
    pub async fn wait(&mut self) -> ShoutscopeResult<()> {
        let Some(handle) = self.task_handle.take() else {
            return Ok(());
        };
        match handle.await {
            Ok(result) => result,
            Err(e) => Err(ShoutscopeError::channel_error(format!(
                "watch task panicked: {}",
                e
            ))),
        }
    }

    /// Ask the watch task to stop and wait for it
    pub async fn shutdown(&mut self) -> ShoutscopeResult<()> {
        info!("Shutting down watch runtime");

        // The task may already be gone
        let _ = self.send_command(Command::Shutdown).await;

        match tokio::time::timeout(SHUTDOWN_GRACE, self.wait()).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Watch task did not stop within {:?}", SHUTDOWN_GRACE);
                Err(ShoutscopeError::channel_error("watch task did not stop in time"))
            }
        }
    }
}
