use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;

/// The actions a user can ask for, one per input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Solve,
    Reset,
    NewMaze,
    Help,
    Quit,
}

impl Command {
    /// The full word accepted on input
    pub fn name(&self) -> &str {
        match self {
            Command::Solve => "solve",
            Command::Reset => "reset",
            Command::NewMaze => "new",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Command::Solve => "find and reveal the path from S to G",
            Command::Reset => "clear the revealed path",
            Command::NewMaze => "generate a new random maze",
            Command::Help => "show this list",
            Command::Quit => "exit",
        }
    }

    /// iterates over all commands
    pub fn iterate() -> impl Iterator<Item = Command> {
        [
            Command::Solve,
            Command::Reset,
            Command::NewMaze,
            Command::Help,
            Command::Quit,
        ]
        .into_iter()
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "solve" => Ok(Command::Solve),
            "r" | "reset" => Ok(Command::Reset),
            "n" | "new" => Ok(Command::NewMaze),
            "h" | "?" | "help" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => Err(anyhow!("Unknown command: {:?} (try \"help\")", other)),
        }
    }
}
