use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning an input line into a [`Command`](crate::command::Command).
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line held no command name (blank, or only the background marker).
    #[error("no command given")]
    Empty,

    /// The token buffer could not grow.
    #[error("out of memory while splitting arguments: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Errors reading the search path out of the session environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("{0} environment variable is not set")]
    NotSet(&'static str),
}

/// Per-command failures surfaced by the executor.
///
/// None of these end the session; [`Interpreter::run_line`](crate::Interpreter::run_line)
/// turns each of them into a diagnostic on the error stream.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Could not find {name}")]
    NotFound { name: String },

    #[error("Could not execute {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Problem with calling command: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to write command output: {0}")]
    Output(#[from] io::Error),

    #[error(transparent)]
    Builtin(#[from] anyhow::Error),
}

impl ExecError {
    /// True when the command could not be resolved at all.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExecError::NotFound { .. })
    }
}
