use crate::env::Environment;
use crate::error::ParseError;
use crate::lexer;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// One parsed input line: the command name, its arguments, and whether it runs in the background.
///
/// A `Command` is consumed by a single execution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    arguments: Vec<String>,
    background: bool,
}

impl Command {
    /// Parses a raw input line.
    ///
    /// A trailing standalone `&` is stripped and marks the command as background.
    /// Lines with no command name left (blank, or just `&`) are rejected with
    /// [`ParseError::Empty`], so `arguments()[0]` always exists and is never the marker.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut arguments = lexer::split_into_tokens(line)?;
        let background = lexer::split_background_marker(&mut arguments);
        if arguments.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self {
            arguments,
            background,
        })
    }

    /// The command name, i.e. argument 0.
    pub fn name(&self) -> &str {
        &self.arguments[0]
    }

    /// Every argument including the command name, without the background marker.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Arguments following the command name.
    pub fn args(&self) -> &[String] {
        &self.arguments[1..]
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_background(&self) -> bool {
        self.background
    }
}

/// Object-safe trait for an in-process command.
pub trait ExecutableCommand {
    /// Runs the command against the session environment.
    ///
    /// Regular output goes to `stdout`, diagnostics to `stderr`.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
