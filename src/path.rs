//! Search-path lookup for bare command names.
//!
//! The search path is re-read from the session [`Environment`] on every request,
//! so a changed `PATH` is visible to the very next command.

use crate::env::{Environment, PATH_VAR};
use crate::error::EnvError;
use std::ffi::OsStr;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Splits the session's search path into its directories, in priority order.
///
/// Entries are separated by the platform path-list separator (`:` on POSIX).
/// Empty entries are dropped.
pub fn search_directories(env: &Environment) -> Result<Vec<PathBuf>, EnvError> {
    let value = env.get_var(PATH_VAR).ok_or(EnvError::NotSet(PATH_VAR))?;
    Ok(std::env::split_paths(OsStr::new(&value))
        .filter(|dir| !dir.as_os_str().is_empty())
        .collect())
}

/// Finds the first search-path directory holding a regular file or symlink called `name`.
///
/// Returns the directory joined with `name`, as the directory was written in the
/// search path. Directories that cannot be listed are skipped. A missing search
/// path yields `None` rather than an error.
pub fn find_on_path(env: &Environment, name: &str) -> Option<PathBuf> {
    let dirs = match search_directories(env) {
        Ok(dirs) => dirs,
        Err(err) => {
            warn!("{err}; cannot look up {name}");
            return None;
        }
    };

    for dir in dirs {
        let entries = match sorted_entries(&env.resolve(&dir)) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("skipping search path entry {}: {err}", dir.display());
                continue;
            }
        };
        if entries.iter().any(|entry| is_candidate(entry, name)) {
            let found = dir.join(name);
            debug!("resolved {name} to {}", found.display());
            return Some(found);
        }
    }
    debug!("{name} not found on search path");
    None
}

/// Directory listing ordered by file name. Entries that fail to read are left out.
fn sorted_entries(dir: &Path) -> std::io::Result<Vec<DirEntry>> {
    let mut entries: Vec<DirEntry> = fs::read_dir(dir)?.filter_map(Result::ok).collect();
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Exact name match on an entry that is a regular file or a symlink (not followed).
fn is_candidate(entry: &DirEntry, name: &str) -> bool {
    if entry.file_name().as_os_str() != OsStr::new(name) {
        return false;
    }
    entry
        .file_type()
        .map(|t| t.is_file() || t.is_symlink())
        .unwrap_or(false)
}
