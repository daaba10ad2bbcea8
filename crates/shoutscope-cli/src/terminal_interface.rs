//! Terminal Interface Implementation
//!
//! Line-oriented REPL over the watch runtime. Queries about the network go
//! straight to the overlay; anything that reads the peer directory or the
//! watch filter goes through a `WatchSnapshot`.

use std::io::Write;

use shoutscope_core::{AppEvent, GroupName, PeerId};
use shoutscope_runtime::WatchHandle;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::commands::{ReplCommand, HELP_TEXT};
use crate::error::{CliError, Result};

/// Name shown for peers missing from the directory
const UNKNOWN_NAME: &str = "unknown";

/// Oldest history entries are dropped past this many lines
const HISTORY_LIMIT: usize = 500;

/// Whether the REPL keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Render an observed shout for the operator
pub fn format_shout(event: &AppEvent, show_sender: bool) -> String {
    let AppEvent::ShoutObserved {
        name,
        group,
        payload,
        ..
    } = event;
    if show_sender {
        format!("[{}] {}: {}", group, name, payload)
    } else {
        payload.clone()
    }
}

// ----------------------------------------------------------------------------
// Terminal Interface
// ----------------------------------------------------------------------------

/// Interactive command loop bound to one watch runtime
pub struct TerminalInterface<'a> {
    handle: &'a WatchHandle,
    prompt: String,
    /// Non-blank lines entered this session, oldest first
    history: Vec<String>,
}

impl<'a> TerminalInterface<'a> {
    pub fn new(handle: &'a WatchHandle, prompt: impl Into<String>) -> Self {
        Self {
            handle,
            prompt: prompt.into(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Read commands from `input` until `exit`, end of input or Ctrl-C
    ///
    /// Results go to `out`, usage and lookup errors to `err`. Returns an error
    /// only when the watch task is gone or a writer fails.
    pub async fn run<R, W, E>(&mut self, input: R, out: &mut W, err: &mut E) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        E: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(out, "{}", self.prompt)?;
            out.flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    None
                }
            };
            let Some(line) = line else {
                writeln!(out)?;
                debug!("End of input");
                return Ok(());
            };

            match self.execute_line(&line, out).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => writeln!(err, "{}", e)?,
            }
        }
    }

    /// Parse and execute one input line
    ///
    /// Every non-blank line is recorded in the history, including the ones
    /// that fail to parse.
    pub async fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        self.record(line);
        match ReplCommand::parse(line)? {
            Some(command) => self.execute(command, out).await,
            None => Ok(Flow::Continue),
        }
    }

    pub async fn execute<W: Write>(&self, command: ReplCommand, out: &mut W) -> Result<Flow> {
        match command {
            ReplCommand::NodeList => self.print_node_list(out).await?,
            ReplCommand::NodeInfo(peer_id) => self.print_node_info(&peer_id, out).await?,
            ReplCommand::NodeListen(peer_id) => self.handle.watch_peer(peer_id).await?,
            ReplCommand::GroupList => self.print_group_list(out).await?,
            ReplCommand::GroupInfo(group) => self.print_group_info(&group, out).await?,
            ReplCommand::GroupListen(group) => self.handle.watch_group(group).await?,
            ReplCommand::Stop => self.handle.clear_watch().await?,
            ReplCommand::Status => self.print_status(out).await?,
            ReplCommand::History => self.print_history(out)?,
            ReplCommand::Help => writeln!(out, "{}", HELP_TEXT)?,
            ReplCommand::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn record(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || self.history.last().is_some_and(|last| last == line) {
            return;
        }
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(line.to_string());
    }

    fn print_history<W: Write>(&self, out: &mut W) -> Result<()> {
        for (index, line) in self.history.iter().enumerate() {
            writeln!(out, "\t{:>4}  {}", index + 1, line)?;
        }
        Ok(())
    }

    async fn print_node_list<W: Write>(&self, out: &mut W) -> Result<()> {
        let peers = self.handle.overlay().peers().await?;
        let snapshot = self.handle.snapshot().await?;
        for peer_id in peers {
            match snapshot.directory.lookup(&peer_id) {
                Some(name) => writeln!(out, "\t{} ({})", peer_id, name)?,
                None => writeln!(out, "\t{}", peer_id)?,
            }
        }
        Ok(())
    }

    async fn print_node_info<W: Write>(&self, peer_id: &PeerId, out: &mut W) -> Result<()> {
        let overlay = self.handle.overlay();
        let snapshot = self.handle.snapshot().await?;
        let name = snapshot.directory.lookup(peer_id);
        let address = overlay.peer_address(peer_id).await?;
        if name.is_none() && address.is_none() {
            return Err(CliError::NotFound(format!("Peer {} does not exist", peer_id)));
        }

        writeln!(out, "\tUUID: {}", peer_id)?;
        writeln!(out, "\tName: {}", name.unwrap_or(UNKNOWN_NAME))?;
        writeln!(out, "\tEndpoint: {}", address.as_deref().unwrap_or(UNKNOWN_NAME))?;

        let groups = overlay.peer_groups(peer_id).await?;
        if groups.is_empty() {
            writeln!(out, "\tGroups: None")?;
        } else {
            let groups: Vec<&str> = groups.iter().map(GroupName::as_str).collect();
            writeln!(out, "\tGroups: {}", groups.join(", "))?;
        }
        Ok(())
    }

    async fn print_group_list<W: Write>(&self, out: &mut W) -> Result<()> {
        let groups = self.handle.overlay().peer_groups_all().await?;
        if groups.is_empty() {
            writeln!(out, "No groups exist")?;
        }
        for group in groups {
            writeln!(out, "\t{}", group)?;
        }
        Ok(())
    }

    async fn print_group_info<W: Write>(&self, group: &GroupName, out: &mut W) -> Result<()> {
        let Some(members) = self.handle.overlay().peers_by_group(group).await? else {
            return Err(CliError::NotFound(format!("No group named {}", group)));
        };
        let snapshot = self.handle.snapshot().await?;

        let noun = if members.len() == 1 { "node" } else { "nodes" };
        writeln!(out, "\tGroup {} has {} {}", group, members.len(), noun)?;
        for peer_id in members {
            match snapshot.directory.lookup(&peer_id) {
                Some(name) => writeln!(out, "\t\t{} ({})", peer_id, name)?,
                None => writeln!(out, "\t\t{}", peer_id)?,
            }
        }
        Ok(())
    }

    async fn print_status<W: Write>(&self, out: &mut W) -> Result<()> {
        let overlay = self.handle.overlay();
        let snapshot = self.handle.snapshot().await?;
        let stats = &snapshot.stats;

        writeln!(out, "\tNode: {} ({})", overlay.name(), overlay.peer_id())?;
        writeln!(out, "\tFilter: {}", snapshot.filter)?;
        writeln!(out, "\tKnown peers: {}", snapshot.directory.len())?;
        writeln!(
            out,
            "\tProcessed: {} command(s), {} event(s)",
            stats.commands_processed, stats.events_processed
        )?;
        writeln!(
            out,
            "\tShouts: {} shown, {} suppressed",
            stats.shouts_observed, stats.shouts_suppressed
        )?;
        writeln!(
            out,
            "\tGroups: {} joined, {} left, {} failed",
            stats.groups_joined, stats.groups_left, stats.subscription_failures
        )?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
