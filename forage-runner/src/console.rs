//! Line-based command console read from stdin on a helper thread.

use crossbeam_channel::{unbounded, Receiver};
use forage_core::Handle;
use forage_simulation::{Command, GoatAttributes};
use glam::Vec2;
use log::{debug, warn};
use std::io::{self, BufRead};
use std::thread;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' takes {expected} arguments, got {found}")]
    Arity {
        command: String,
        expected: usize,
        found: usize,
    },

    #[error("'{0}' is not a valid number")]
    Number(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    World(Command),
    /// Log whatever sits under a point.
    Inspect(Vec2),
    Quit,
}

/// Parses one console line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let expect = |expected: usize| -> Result<(), ParseError> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ParseError::Arity {
                command: name.to_string(),
                expected,
                found: args.len(),
            })
        }
    };

    let command = match name {
        "pause" => {
            expect(0)?;
            ConsoleCommand::World(Command::SetPaused { paused: true })
        }
        "resume" => {
            expect(0)?;
            ConsoleCommand::World(Command::SetPaused { paused: false })
        }
        "toggle" => {
            expect(0)?;
            ConsoleCommand::World(Command::TogglePause)
        }
        "quit" | "exit" => {
            expect(0)?;
            ConsoleCommand::Quit
        }
        "inspect" => {
            expect(2)?;
            ConsoleCommand::Inspect(point(&args[0..2])?)
        }
        "add-cabbage" => {
            expect(3)?;
            ConsoleCommand::World(Command::AddCabbage {
                position: point(&args[0..2])?,
                size: number(args[2])?,
            })
        }
        "add-goat" => {
            expect(7)?;
            ConsoleCommand::World(Command::AddGoat {
                position: point(&args[0..2])?,
                attributes: attributes(&args[2..7])?,
            })
        }
        "set-goat" => {
            expect(7)?;
            ConsoleCommand::World(Command::ModifyGoat {
                id: handle(&args[0..2])?,
                attributes: attributes(&args[2..7])?,
            })
        }
        "set-cabbage" => {
            expect(3)?;
            ConsoleCommand::World(Command::ModifyCabbage {
                id: handle(&args[0..2])?,
                size: number(args[2])?,
            })
        }
        "remove-goat" => {
            expect(2)?;
            ConsoleCommand::World(Command::RemoveGoat { id: handle(&args[0..2])? })
        }
        "remove-cabbage" => {
            expect(2)?;
            ConsoleCommand::World(Command::RemoveCabbage { id: handle(&args[0..2])? })
        }
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn number(word: &str) -> Result<f32, ParseError> {
    word.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::Number(word.to_string()))
}

fn integer(word: &str) -> Result<u32, ParseError> {
    word.parse().map_err(|_| ParseError::Number(word.to_string()))
}

fn point(words: &[&str]) -> Result<Vec2, ParseError> {
    Ok(Vec2::new(number(words[0])?, number(words[1])?))
}

fn handle(words: &[&str]) -> Result<Handle, ParseError> {
    Ok(Handle::new(integer(words[0])?, integer(words[1])?))
}

/// SIZE SPEED FERTILITY STAMINA RATE
fn attributes(words: &[&str]) -> Result<GoatAttributes, ParseError> {
    Ok(GoatAttributes {
        size: number(words[0])?,
        speed: number(words[1])?,
        fertility: number(words[2])?,
        stamina: number(words[3])?,
        consumption_rate: number(words[4])?,
    })
}

/// Starts the stdin reader. The channel disconnects when stdin reaches EOF.
pub fn spawn_reader() -> Receiver<ConsoleCommand> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Stopped reading commands: {}", e);
                    break;
                }
            };
            match parse_line(&line) {
                Ok(Some(command)) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring command: {}", e),
            }
        }
        debug!("Command reader finished");
    });
    rx
}
