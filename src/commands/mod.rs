//! User input for the dashboard.
//!
//! Lines typed on stdin are parsed into [`Command`]s and queued for the
//! tracker loop. Anything that is not a `:` command is a search term.

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

use crate::models::view::SortKey;

/// Dashboard commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the search term (empty clears it)
    Search(String),
    /// Column header click
    Sort(SortKey),
    /// Drop cached data and reload everything
    Retry,
    /// Refetch now instead of waiting for the next tick
    Refresh,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command :{0} (try :sort <key>, :retry, :refresh, :clear or :quit)")]
    Unknown(String),

    #[error("Missing sort key (expected rank, name, price or change)")]
    MissingSortKey,

    #[error("Unknown sort key {0:?} (expected rank, name, price or change)")]
    InvalidSortKey(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();

        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Search(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();

        match name.as_str() {
            "sort" => {
                let key = parts.next().ok_or(CommandError::MissingSortKey)?;
                key.parse::<SortKey>()
                    .map(Command::Sort)
                    .map_err(|_| CommandError::InvalidSortKey(key.to_string()))
            }
            "retry" | "reload" => Ok(Command::Retry),
            "refresh" => Ok(Command::Refresh),
            "clear" => Ok(Command::Search(String::new())),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => other
                .parse::<SortKey>()
                .map(Command::Sort)
                .map_err(|_| CommandError::Unknown(other.to_string())),
        }
    }
}

/// Command queue feeding the tracker loop
#[derive(Clone)]
pub struct CommandQueue {
    sender: UnboundedSender<Command>,
}

impl CommandQueue {
    /// Create a queue and the receiving end for the tracker
    pub fn new() -> (Self, UnboundedReceiver<Command>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Queue a command (non-blocking)
    pub fn send(&self, command: Command) {
        if let Err(e) = self.sender.send(command) {
            error!("Failed to queue command: {}", e);
        }
    }

    /// Parse and queue a raw input line
    pub fn send_line(&self, line: &str) {
        match Command::parse(line) {
            Ok(command) => {
                debug!("Queued command {:?}", command);
                self.send(command);
            }
            Err(e) => warn!("{}", e),
        }
    }

    /// Read stdin in a dedicated task until EOF, then ask the tracker to quit
    pub fn spawn_stdin_reader(&self) -> tokio::task::JoinHandle<()> {
        let queue = self.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => queue.send_line(&line),
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
            queue.send(Command::Quit);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_trimmed_search() {
        assert_eq!(Command::parse("  bit \n"), Ok(Command::Search("bit".to_string())));
        assert_eq!(Command::parse(""), Ok(Command::Search(String::new())));
    }

    #[test]
    fn sort_commands_map_to_header_clicks() {
        assert_eq!(Command::parse(":sort name"), Ok(Command::Sort(SortKey::Name)));
        assert_eq!(Command::parse(":SORT Price"), Ok(Command::Sort(SortKey::Price)));
        assert_eq!(Command::parse(":change"), Ok(Command::Sort(SortKey::Change)));
        assert_eq!(Command::parse(":sort"), Err(CommandError::MissingSortKey));
        assert_eq!(
            Command::parse(":sort volume"),
            Err(CommandError::InvalidSortKey("volume".to_string()))
        );
    }

    #[test]
    fn control_commands() {
        assert_eq!(Command::parse(":retry"), Ok(Command::Retry));
        assert_eq!(Command::parse(":refresh"), Ok(Command::Refresh));
        assert_eq!(Command::parse(":clear"), Ok(Command::Search(String::new())));
        assert_eq!(Command::parse(":q"), Ok(Command::Quit));
        assert_eq!(Command::parse(":launch"), Err(CommandError::Unknown("launch".to_string())));
    }

    #[tokio::test]
    async fn queue_forwards_parsed_lines_and_drops_bad_ones() {
        let (queue, mut receiver) = CommandQueue::new();
        queue.send_line(":bogus");
        queue.send_line("eth");
        queue.send(Command::Quit);

        assert_eq!(receiver.recv().await, Some(Command::Search("eth".to_string())));
        assert_eq!(receiver.recv().await, Some(Command::Quit));
    }
}
