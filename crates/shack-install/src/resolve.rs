//! Daemon executable resolution
//!
//! Repeated release extractions can leave several versioned trees under the
//! installation root at once. Resolution prefers the newest
//! `<subdir>/bin/<name>` layout, then a flat `bin/<name>`, then a full
//! recursive walk, so a release whose archive layout shifted still resolves
//! instead of erroring out.
//!
//! Nothing here is cached: installation contents change underneath us when
//! a reinstall runs, and the next resolution must see the new tree.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

/// Default installation root, relative to the process working directory.
pub fn default_install_root() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("hamlib")
}

/// Find the `bin/` directory of the most recently installed release.
///
/// Scans immediate subdirectories of `root` for `bin/<name>`; among matches
/// the newest directory modification time wins, so a fresh install shadows
/// stale leftovers from earlier versions. Falls back to a flat `root/bin`.
pub fn newest_bin_dir(root: &Path, name: &str) -> Option<PathBuf> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    if let Ok(entries) = std::fs::read_dir(root) {
        for entry in entries.flatten() {
            let sub = entry.path();
            if !sub.is_dir() {
                continue;
            }
            let bin = sub.join("bin");
            if !bin.join(name).is_file() {
                continue;
            }
            let mtime = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            match &newest {
                Some((best, _)) if *best >= mtime => {}
                _ => newest = Some((mtime, bin)),
            }
        }
    }

    if let Some((_, bin)) = newest {
        return Some(bin);
    }

    let flat = root.join("bin");
    if flat.join(name).is_file() {
        return Some(flat);
    }

    None
}

/// Resolve a daemon executable under the installation root.
pub fn resolve_executable(root: &Path, name: &str) -> Option<PathBuf> {
    if let Some(bin) = newest_bin_dir(root, name) {
        return Some(bin.join(name));
    }

    let found = walk_for(root, name);
    if found.is_none() {
        debug!("{} not found under {}", name, root.display());
    }
    found
}

/// Depth-first walk returning the first file matching `name`.
fn walk_for(dir: &Path, name: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.file_name().is_some_and(|f| f == name) {
            return Some(path);
        }
    }

    subdirs.into_iter().find_map(|sub| walk_for(&sub, name))
}
