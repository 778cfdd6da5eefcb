use anyhow::Result;
use rash::config::{Config, Options};
use rash::{Interpreter, signal};
use std::io;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let options: Options = argh::from_env();
    let config = Config::from(options);

    if let Err(err) = init_tracing(&config) {
        eprintln!("Failed to initialize logging: {err:#}");
        return ExitCode::FAILURE;
    }

    let mut interpreter = Interpreter::default();
    match config.command.as_deref() {
        Some(line) => run_once(&mut interpreter, line),
        None => run_interactive(&mut interpreter, &config),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--log-level`.
fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}

fn run_once(interpreter: &mut Interpreter, line: &str) -> ExitCode {
    match interpreter.run_line(line, &mut io::stdout(), &mut io::stderr()) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("rash: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_interactive(interpreter: &mut Interpreter, config: &Config) -> ExitCode {
    if let Err(err) = signal::install_interrupt_handler() {
        warn!("could not install interrupt handler: {err}");
    }
    match interpreter.repl(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rash: {err}");
            ExitCode::FAILURE
        }
    }
}
