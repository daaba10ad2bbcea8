//! REPL command parsing for the shoutscope CLI

use shoutscope_core::{GroupName, PeerId};

use crate::error::{CliError, Result};

/// Text printed by `help`
pub const HELP_TEXT: &str = "Available commands:
\tnode list
\tgroup list
\tnode info <uuid>
\tgroup info <group name>
\tnode listen <uuid>
\tgroup listen <group name>
\tstop
\tstatus
\thistory
\thelp
\texit";

const NODE_USAGE: &str = "usage: node list | node info <uuid> | node listen <uuid>";
const GROUP_USAGE: &str = "usage: group list | group info <group name> | group listen <group name>";

/// One line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    NodeList,
    NodeInfo(PeerId),
    NodeListen(PeerId),
    GroupList,
    GroupInfo(GroupName),
    GroupListen(GroupName),
    /// Stop watching and leave every joined group
    Stop,
    Status,
    /// Lines entered so far this session
    History,
    Help,
    Exit,
}

impl ReplCommand {
    /// Parse a whitespace-separated input line
    ///
    /// Blank lines yield `Ok(None)`. Tokens after the expected arguments are
    /// ignored.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, rest)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match head {
            "exit" | "quit" | "q" => ReplCommand::Exit,
            "help" => ReplCommand::Help,
            "stop" => ReplCommand::Stop,
            "status" => ReplCommand::Status,
            "history" => ReplCommand::History,
            "node" => Self::parse_node(rest)?,
            "group" => Self::parse_group(rest)?,
            other => {
                return Err(CliError::Usage(format!(
                    "Unknown command '{}', type 'help' for the list of commands",
                    other
                )))
            }
        };
        Ok(Some(command))
    }

    fn parse_node(args: &[&str]) -> Result<Self> {
        match args {
            ["list", ..] => Ok(ReplCommand::NodeList),
            ["info", id, ..] => Ok(ReplCommand::NodeInfo(PeerId::from(*id))),
            ["listen", id, ..] => Ok(ReplCommand::NodeListen(PeerId::from(*id))),
            ["info"] => Err(CliError::Usage("usage: node info <uuid>".to_string())),
            ["listen"] => Err(CliError::Usage("usage: node listen <uuid>".to_string())),
            _ => Err(CliError::Usage(NODE_USAGE.to_string())),
        }
    }

    fn parse_group(args: &[&str]) -> Result<Self> {
        match args {
            ["list", ..] => Ok(ReplCommand::GroupList),
            ["info", name, ..] => Ok(ReplCommand::GroupInfo(GroupName::from(*name))),
            ["listen", name, ..] => Ok(ReplCommand::GroupListen(GroupName::from(*name))),
            ["info"] => Err(CliError::Usage("usage: group info <group name>".to_string())),
            ["listen"] => Err(CliError::Usage("usage: group listen <group name>".to_string())),
            _ => Err(CliError::Usage(GROUP_USAGE.to_string())),
        }
    }
}
