use crate::command::{Command, ExitCode};
use crate::env::Environment;
use crate::path;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};
use tracing::{debug, warn};

/// Resolve a command name to the program that should run for it.
///
/// Behavior:
/// - A name that refers to an existing regular file, relative to the session
///   directory or absolute, is used as given.
/// - Otherwise the name is looked up on the search path (see [`path::find_on_path`]).
///
/// Returns `None` when neither step finds anything.
pub fn resolve_program(env: &Environment, name: &str) -> Option<PathBuf> {
    let direct = Path::new(name);
    if is_regular_file(&env.resolve(direct)) {
        debug!("using {name} as a direct path");
        return Some(direct.to_path_buf());
    }
    path::find_on_path(env, name)
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Two-step process protocol used by the interpreter: launch, then optionally wait.
pub trait Launcher {
    /// Starts `program` with the full argument list of `command` and returns the child's pid.
    fn launch(&mut self, program: &Path, command: &Command, env: &Environment) -> io::Result<u32>;

    /// Blocks until the child `pid` exits and returns its exit code.
    fn wait(&mut self, pid: u32) -> io::Result<ExitCode>;

    /// Collects children that already exited without blocking.
    fn reap(&mut self) -> Vec<(u32, ExitCode)>;
}

/// [`Launcher`] backed by real OS processes.
///
/// Children are tracked until they are waited for or reaped, so background
/// commands do not linger as zombies.
#[derive(Debug, Default)]
pub struct ChildLauncher {
    children: HashMap<u32, Child>,
}

impl ChildLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children that have not been collected yet.
    pub fn pending(&self) -> usize {
        self.children.len()
    }
}

impl Launcher for ChildLauncher {
    fn launch(&mut self, program: &Path, command: &Command, env: &Environment) -> io::Result<u32> {
        let mut process = std::process::Command::new(env.resolve(program));
        process
            .arg0(command.name())
            .args(command.args())
            .current_dir(&env.current_dir);
        if !env.inherit {
            process.env_clear();
        }
        process.envs(&env.vars);

        let child = process.spawn()?;
        let pid = child.id();
        debug!("spawned {} as pid {pid}", program.display());
        self.children.insert(pid, child);
        Ok(pid)
    }

    fn wait(&mut self, pid: u32) -> io::Result<ExitCode> {
        let mut child = self.children.remove(&pid).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no child with pid {pid}"))
        })?;
        let exit_status = child.wait()?;
        Ok(exit_code(exit_status))
    }

    fn reap(&mut self) -> Vec<(u32, ExitCode)> {
        let mut finished = Vec::new();
        self.children.retain(|pid, child| match child.try_wait() {
            Ok(Some(exit_status)) => {
                finished.push((*pid, exit_code(exit_status)));
                false
            }
            Ok(None) => true,
            Err(err) => {
                warn!("could not poll background pid {pid}: {err}");
                false
            }
        });
        finished
    }
}

/// Exit code of a finished child, with signal deaths mapped the way shells report them.
pub fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PATH_VAR;
    use std::fs::File;
    use std::os::unix::fs::PermissionsExt;
    use std::thread;
    use std::time::Duration;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, body).expect("write script");
        p
    }

    fn sh(script: &Path) -> Command {
        Command::parse(&format!("/bin/sh {}", script.display())).unwrap()
    }

    #[test]
    fn direct_absolute_path_is_used_as_given() {
        let env = Environment::isolated("/");
        assert_eq!(resolve_program(&env, "/bin/sh"), Some(PathBuf::from("/bin/sh")));
    }

    #[test]
    fn direct_relative_path_uses_session_dir() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("local")).unwrap();
        let env = Environment::isolated(dir.path());
        assert_eq!(resolve_program(&env, "local"), Some(PathBuf::from("local")));
    }

    #[test]
    fn directory_is_not_a_direct_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let env = Environment::isolated(dir.path());
        assert_eq!(resolve_program(&env, "sub"), None);
    }

    #[test]
    fn bare_name_falls_back_to_search_path() {
        let bin = tempfile::tempdir().unwrap();
        File::create(bin.path().join("tool")).unwrap();
        let mut env = Environment::isolated("/");
        env.set_var(PATH_VAR, bin.path().to_string_lossy());
        assert_eq!(resolve_program(&env, "tool"), Some(bin.path().join("tool")));
    }

    #[test]
    fn unknown_name_is_none() {
        let mut env = Environment::isolated("/");
        env.set_var(PATH_VAR, "/definitely/not/a/dir");
        assert_eq!(resolve_program(&env, "definitely_not_a_real_cmd_xyz"), None);
    }

    #[test]
    fn wait_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "three.sh", "exit 3\n");
        let env = Environment::isolated(dir.path());

        let mut launcher = ChildLauncher::new();
        let pid = launcher.launch(Path::new("/bin/sh"), &sh(&script), &env).unwrap();
        assert_eq!(launcher.wait(pid).unwrap(), 3);
        assert_eq!(launcher.pending(), 0);
    }

    #[test]
    fn signal_death_maps_to_128_plus_signal() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "kill.sh", "kill -9 $$\n");
        let env = Environment::isolated(dir.path());

        let mut launcher = ChildLauncher::new();
        let pid = launcher.launch(Path::new("/bin/sh"), &sh(&script), &env).unwrap();
        assert_eq!(launcher.wait(pid).unwrap(), 137);
    }

    #[test]
    fn child_runs_in_session_dir_with_session_vars() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "env.sh", "echo \"$GREETING\" > out.txt\n");
        let mut env = Environment::isolated(dir.path());
        env.set_var("GREETING", "hello");

        let mut launcher = ChildLauncher::new();
        let pid = launcher.launch(Path::new("/bin/sh"), &sh(&script), &env).unwrap();
        assert_eq!(launcher.wait(pid).unwrap(), 0);

        let out = fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn relative_program_is_resolved_against_session_dir() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "ok.sh", "exit 0\n");
        let env = Environment::isolated("/bin");

        let mut launcher = ChildLauncher::new();
        let cmd = Command::parse(&format!("sh {}", script.display())).unwrap();
        let pid = launcher.launch(Path::new("sh"), &cmd, &env).unwrap();
        assert_eq!(launcher.wait(pid).unwrap(), 0);
    }

    #[test]
    fn non_executable_file_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let plain = write_script(dir.path(), "plain", "not a program\n");
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();
        let env = Environment::isolated(dir.path());

        let mut launcher = ChildLauncher::new();
        let cmd = Command::parse("plain").unwrap();
        let err = launcher.launch(Path::new("plain"), &cmd, &env).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(launcher.pending(), 0);
    }

    #[test]
    fn waiting_on_unknown_pid_fails() {
        let mut launcher = ChildLauncher::new();
        let err = launcher.wait(999_999).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn background_children_are_reaped() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "quick.sh", "exit 7\n");
        let env = Environment::isolated(dir.path());

        let mut launcher = ChildLauncher::new();
        let pid = launcher.launch(Path::new("/bin/sh"), &sh(&script), &env).unwrap();

        let mut reaped = Vec::new();
        for _ in 0..100 {
            reaped = launcher.reap();
            if !reaped.is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(reaped, vec![(pid, 7)]);
        assert_eq!(launcher.pending(), 0);
    }
}
