use argh::FromArgs;

const DEFAULT_HISTORY_SIZE: usize = 1000;
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(FromArgs, Debug)]
/// A small interactive shell.
pub struct Options {
    #[argh(option, short = 'c')]
    /// run a single command line and exit with its status.
    pub command: Option<String>,

    #[argh(switch)]
    /// print the prompt without colors.
    pub no_color: bool,

    #[argh(option, default = "DEFAULT_HISTORY_SIZE")]
    /// number of lines kept in the line-editor history.
    pub history_size: usize,

    #[argh(option, default = "DEFAULT_LOG_FILTER.to_string()")]
    /// log filter used when RUST_LOG is not set, e.g. "debug" or "rash=trace".
    pub log_level: String,
}

/// Runtime settings of a shell session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command: Option<String>,
    pub color: bool,
    pub history_size: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: None,
            color: true,
            history_size: DEFAULT_HISTORY_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl From<Options> for Config {
    fn from(options: Options) -> Self {
        Self {
            command: options.command,
            color: !options.no_color,
            history_size: options.history_size,
            log_filter: options.log_level,
        }
    }
}

impl Config {
    /// Line-editor settings for the interactive loop.
    pub fn editor_config(&self) -> rustyline::Result<rustyline::Config> {
        Ok(rustyline::Config::builder()
            .auto_add_history(true)
            .completion_type(rustyline::CompletionType::List)
            .max_history_size(self.history_size)?
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let options = Options::from_args(&["rash"], args).expect("valid arguments");
        Config::from(options)
    }

    #[test]
    fn defaults_match_plain_invocation() {
        assert_eq!(parse(&[]), Config::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "-c",
            "pwd",
            "--no-color",
            "--history-size",
            "10",
            "--log-level",
            "debug",
        ]);
        assert_eq!(config.command.as_deref(), Some("pwd"));
        assert!(!config.color);
        assert_eq!(config.history_size, 10);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn editor_config_sets_history_and_completion() {
        let config = Config {
            history_size: 42,
            ..Config::default()
        };
        let editor = config.editor_config().unwrap();
        assert_eq!(editor.max_history_size(), 42);
        assert!(editor.auto_add_history());
        assert_eq!(editor.completion_type(), rustyline::CompletionType::List);
    }
}
