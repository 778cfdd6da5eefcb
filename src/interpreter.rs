use crate::builtin;
use crate::command::{Command, CommandFactory, ExitCode};
use crate::config::Config;
use crate::env::Environment;
use crate::error::{ExecError, ParseError};
use crate::external::{self, ChildLauncher, Launcher};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};
use tracing::debug;

/// A minimal interactive shell: one command per line, built-ins first, then
/// direct paths, then the search path.
///
/// The interpreter owns the session [`Environment`], the built-in dispatch table
/// and the [`Launcher`] used to start external programs.
///
/// Example
/// ```
/// use rash::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let code = sh.run_line("prodhash exit", &mut out, &mut std::io::sink()).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(out, b"exit:\t0x460\n");
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: Vec<Box<dyn CommandFactory>>,
    launcher: Box<dyn Launcher>,
}

impl Interpreter {
    /// Create an interpreter over `env` that starts programs through `launcher`.
    pub fn new(env: Environment, launcher: Box<dyn Launcher>) -> Self {
        Self {
            env,
            builtins: builtin::builtins(),
            launcher,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// True once `exit` has run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Executes one parsed command.
    ///
    /// Built-ins run in-process and are never looked up on disk. Anything else is
    /// resolved to a program, launched, reported as `[<name> pid: <pid>]`, and for
    /// foreground commands awaited and reported as `[<pid> -> <status>]`.
    /// Background commands return 0 as soon as they are launched.
    pub fn execute(
        &mut self,
        command: Command,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<ExitCode, ExecError> {
        let name = command.name();
        let args: Vec<&str> = command.args().iter().map(String::as_str).collect();
        for factory in &self.builtins {
            if let Some(cmd) = factory.try_create(&self.env, name, &args) {
                debug!("dispatching {name} to built-in");
                return Ok(cmd.execute(stdout, stderr, &mut self.env)?);
            }
        }

        let program = external::resolve_program(&self.env, name).ok_or_else(|| {
            ExecError::NotFound {
                name: name.to_owned(),
            }
        })?;
        let pid = self
            .launcher
            .launch(&program, &command, &self.env)
            .map_err(|source| ExecError::Spawn {
                program: program.clone(),
                source,
            })?;
        writeln!(stdout, "[{name} pid: {pid}]")?;

        if command.is_background() {
            return Ok(0);
        }
        let code = self
            .launcher
            .wait(pid)
            .map_err(|source| ExecError::Wait { pid, source })?;
        writeln!(stdout, "[{pid} -> {code}]")?;
        Ok(code)
    }

    /// Parses and executes one input line, reporting every failure on `stderr`.
    ///
    /// Blank lines are ignored. Returns the status of the line: the built-in's or
    /// foreground child's exit code, 0 for a launched background command, 1 when
    /// the command could not be parsed, found or started. Only a failure to write
    /// to `stdout`/`stderr` is returned as an error.
    pub fn run_line(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> io::Result<ExitCode> {
        for (pid, code) in self.launcher.reap() {
            debug!("background pid {pid} finished with {code}");
        }

        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(ParseError::Empty) => return Ok(0),
            Err(err @ ParseError::Allocation(_)) => {
                writeln!(stderr, "Could not parse command: {err}")?;
                return Ok(1);
            }
        };

        match self.execute(command, stdout, stderr) {
            Ok(code) => Ok(code),
            Err(ExecError::Output(err)) => Err(err),
            Err(err) => {
                writeln!(stderr, "{err}")?;
                Ok(1)
            }
        }
    }

    /// Prompt showing the session directory, green unless color is disabled.
    pub fn prompt(&self, color: bool) -> String {
        let dir = self.env.current_dir.display();
        if color {
            format!("\x1b[32m{dir} >> \x1b[0m")
        } else {
            format!("{dir} >> ")
        }
    }

    /// Reads and runs lines until end of input, an interrupt at the prompt, or `exit`.
    pub fn repl(&mut self, config: &Config) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::with_config(config.editor_config()?)?;

        while !self.should_exit() {
            match rl.readline(&self.prompt(config.color)) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.run_line(&line, &mut io::stdout().lock(), &mut io::stderr().lock())?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("\nGoodbye!");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Interpreter bound to the current process environment, launching real processes.
    fn default() -> Self {
        Self::new(Environment::new(), Box::new(ChildLauncher::new()))
    }
}
