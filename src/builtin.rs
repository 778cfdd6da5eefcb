use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use anyhow::{Context, Result, bail};
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::io::Write;

/// Terminal control sequence that erases the screen and homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process or consulting the search path.
/// Every argument is positional: words like `-v` or `help` reach the command as-is.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "pwd" or "cd".
    fn name() -> &'static str;

    /// Executes the command against the session environment.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(
        self,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match T::execute(*self, stdout, stderr, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stderr, "{e:#}")?;
                Ok(1)
            }
        }
    }
}

/// Argument error produced by `argh` instead of a command.
struct InvalidArgs {
    output: String,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        writeln!(stderr, "{}", self.output.trim_end())?;
        Ok(1)
    }
}

/// Exact-name entry of the built-in dispatch table.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            // "--" ends flag parsing, so no user word is taken for a flag or for `help`.
            let argv: Vec<&str> = std::iter::once("--").chain(args.iter().copied()).collect();
            Some(match T::from_args(&[name], &argv) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, .. }) => Box::new(InvalidArgs { output }),
            })
        } else {
            None
        }
    }
}

/// The built-in dispatch table: `exit`, `pwd`, `cd`, `clr` and `prodhash`.
pub(crate) fn builtins() -> Vec<Box<dyn CommandFactory>> {
    vec![
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Pwd>::default()),
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<Clr>::default()),
        Box::new(Factory::<ProdHash>::default()),
    ]
}

#[derive(FromArgs)]
/// Exit the shell with status 0.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        writeln!(stdout, "{}", env.current_dir.display())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional, greedy)]
    /// directory to switch to, absolute or relative to the current directory;
    /// further words are ignored.
    pub args: Vec<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        let Some(target) = self.args.into_iter().next().filter(|t| !t.is_empty()) else {
            writeln!(stdout, "Use of cd is: cd <dir>")?;
            return Ok(0);
        };

        let new_dir = env.resolve(&target);
        let canonical = fs::canonicalize(&new_dir)
            .context("Problem changing directory")?;
        if !canonical.is_dir() {
            bail!("Problem changing directory: Not a directory");
        }
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Clear the terminal screen.
pub struct Clr {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Clr {
    fn name() -> &'static str {
        "clr"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        write!(stdout, "{CLEAR_SCREEN}")?;
        stdout.flush()?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the fingerprint of each argument.
pub struct ProdHash {
    #[argh(positional, greedy)]
    /// strings to fingerprint.
    pub words: Vec<String>,
}

impl BuiltinCommand for ProdHash {
    fn name() -> &'static str {
        "prodhash"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        if self.words.is_empty() {
            writeln!(stdout, "Use of prodhash is: prodhash <cmd 1> ... <cmd n>")?;
        }
        for word in &self.words {
            writeln!(stdout, "{word}:\t{:#x}", fingerprint(word))?;
        }
        Ok(0)
    }
}

/// Sum of each byte multiplied by its 1-based position.
///
/// Collisions are expected: `fingerprint("exit") == fingerprint("meow")`.
pub fn fingerprint(s: &str) -> u64 {
    s.bytes().zip(1u64..).fold(0u64, |acc, (byte, position)| {
        acc.wrapping_add(u64::from(byte).wrapping_mul(position))
    })
}
