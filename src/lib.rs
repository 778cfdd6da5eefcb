//! A small interactive shell that runs exactly one command per input line.
//!
//! Each line is split into whitespace-delimited words ([`Command::parse`]); a trailing
//! `&` runs the command in the background. The [`Interpreter`] then dispatches the
//! command name: built-ins (`exit`, `pwd`, `cd`, `clr`, `prodhash`) run in-process,
//! anything else is resolved either as a direct path or by scanning the directories of
//! `PATH` in order, and is launched as a child process that is awaited unless it was
//! sent to the background.
//!
//! There are no pipelines, redirections, expansions or job control.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod external;
mod interpreter;
mod lexer;
pub mod path;
pub mod signal;

pub use command::Command;
pub use config::Config;
pub use env::Environment;
pub use interpreter::Interpreter;
