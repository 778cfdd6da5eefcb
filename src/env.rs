use std::collections::HashMap;
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Name of the variable holding the search path.
pub const PATH_VAR: &str = "PATH";

/// Shell-session state shared by the executor, the built-ins and the path resolver.
///
/// The environment contains:
/// - `vars`: shell-level variables that take precedence over the process environment
///   and are passed to every spawned command.
/// - `current_dir`: the session working directory. `cd` is its only mutator; every
///   relative path the shell touches is resolved against it.
/// - `inherit`: whether lookups fall through to the live process environment.
/// - `should_exit`: set by `exit`; the REPL stops before reading another line.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    pub inherit: bool,
    pub should_exit: bool,
}

impl Environment {
    /// Session bound to the current process: working directory taken from the
    /// process, variables read live from the process environment.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars: HashMap::new(),
            current_dir,
            inherit: true,
            should_exit: false,
        }
    }

    /// Session that sees only `vars`, never the process environment.
    ///
    /// Commands spawned from it start with a cleared environment.
    pub fn isolated(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            current_dir: current_dir.into(),
            inherit: false,
            should_exit: false,
        }
    }

    /// Get the value of a variable.
    ///
    /// Looks up the key in `self.vars` first, then (for inheriting sessions) in the
    /// process environment. Nothing is cached, so outside changes show up on the next call.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| self.inherit.then(|| stdenv::var(key).ok()).flatten())
    }

    /// Set or override a variable in `self.vars`.
    #[cfg(test)]
    pub(crate) fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Resolves `path` against the session working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.current_dir.join(path)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
