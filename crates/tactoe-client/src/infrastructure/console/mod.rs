//! Line-oriented console input standing in for a window system.
//!
//! Each stdin line is one command:
//!
//! ```text
//! click 640 300     primary click at screen coordinates
//! resize 800 600    viewport resized
//! key d             key press (`d` requests the development card)
//! key escape        deselect
//! dump              print the current scene snapshot
//! quit              exit the client
//! ```
//!
//! A line that does not parse is reported and skipped; it never stops the
//! reader.

use tactoe_core::Vec2;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::game_session::{InputEvent, Key};

/// Errors produced while parsing one console line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleParseError {
    #[error("unknown command {0:?} (expected click, resize, key, dump or quit)")]
    UnknownCommand(String),

    #[error("{command}: missing argument <{name}>")]
    MissingArgument {
        command: &'static str,
        name: &'static str,
    },

    #[error("{command}: {value:?} is not a number")]
    InvalidNumber {
        command: &'static str,
        value: String,
    },

    #[error("unknown key {0:?} (expected a single character or \"escape\")")]
    UnknownKey(String),
}

/// One parsed console line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    Input(InputEvent),
    Dump,
    Quit,
}

/// Parses one line.  Blank lines and `#` comments yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`ConsoleParseError`] describing what is wrong with the line.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, ConsoleParseError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    if command.starts_with('#') {
        return Ok(None);
    }

    let parsed = match command.to_ascii_lowercase().as_str() {
        "click" => {
            let x = number(&mut words, "click", "x")?;
            let y = number(&mut words, "click", "y")?;
            ConsoleCommand::Input(InputEvent::Click(Vec2::new(x, y)))
        }
        "resize" => {
            let width = number(&mut words, "resize", "width")?;
            let height = number(&mut words, "resize", "height")?;
            ConsoleCommand::Input(InputEvent::Resize { width, height })
        }
        "key" => {
            let name = words.next().ok_or(ConsoleParseError::MissingArgument {
                command: "key",
                name: "key",
            })?;
            ConsoleCommand::Input(InputEvent::Key(parse_key(name)?))
        }
        "dump" => ConsoleCommand::Dump,
        "quit" | "exit" => ConsoleCommand::Quit,
        _ => return Err(ConsoleParseError::UnknownCommand(command.to_string())),
    };
    Ok(Some(parsed))
}

fn number<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    name: &'static str,
) -> Result<f32, ConsoleParseError> {
    let raw = words
        .next()
        .ok_or(ConsoleParseError::MissingArgument { command, name })?;
    raw.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConsoleParseError::InvalidNumber {
            command,
            value: raw.to_string(),
        })
}

fn parse_key(name: &str) -> Result<Key, ConsoleParseError> {
    if name.eq_ignore_ascii_case("escape") || name.eq_ignore_ascii_case("esc") {
        return Ok(Key::Escape);
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Key::Char(c.to_ascii_lowercase())),
        _ => Err(ConsoleParseError::UnknownKey(name.to_string())),
    }
}

/// Spawns a task reading stdin and returns the command receiver.
///
/// The channel closes when stdin reaches end of file.
pub fn spawn_console_reader() -> mpsc::Receiver<ConsoleCommand> {
    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("stdin read error: {e}");
                    break;
                }
            };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if tx.send(command).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("{e}"),
            }
        }
        debug!("console reader stopped");
    });
    rx
}

// ── Tests ─────────────────────────────────────────────────────────────────────
