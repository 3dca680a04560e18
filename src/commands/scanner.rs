//! Command tree discovery.
//!
//! Walks the commands root and builds a [`CommandNode`] tree of installed
//! command packages. A package is a directory holding an entry-point file
//! (`command.*`) and/or nested packages; at depth 1 it must also carry the
//! `installed.flag` enable marker unless disabled packages are requested.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Stem of a package's entry-point file (`command.sh`, `command.py`, ...).
pub const ENTRY_POINT_STEM: &str = "command";

/// Marker whose presence enables a top-level package.
pub const ENABLE_MARKER: &str = "installed.flag";

/// Root-level directory holding shared support code, never a command.
pub const SHARED_LIB_DIR: &str = "lib";

/// A discovered command package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    /// Directory basename.
    pub name: String,
    /// Package directory.
    pub path: PathBuf,
    /// Entry-point file, if the package has one.
    pub entry_point: Option<PathBuf>,
    /// Nested packages keyed by directory basename.
    pub children: BTreeMap<String, CommandNode>,
}

impl CommandNode {
    /// Whether the package has no nested packages.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Scan the commands root (depth 0).
///
/// Returns `None` when the root holds no command packages at all.
pub fn scan_root(root: &Path, include_disabled: bool) -> Option<CommandNode> {
    scan(root, 0, include_disabled)
}

/// Scan `path` as a package at `depth`.
///
/// Unreadable directories are treated as absent.
pub fn scan(path: &Path, depth: usize, include_disabled: bool) -> Option<CommandNode> {
    let entries = match sorted_entries(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Skipping unreadable directory {}: {}", path.display(), e);
            return None;
        }
    };

    let mut entry_point = None;
    let mut has_marker = false;
    let mut dirs = Vec::new();

    for entry in entries {
        let name = match entry.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        if name.starts_with('.') {
            continue;
        }

        if entry.is_dir() {
            if depth == 0 && name == SHARED_LIB_DIR {
                continue;
            }
            dirs.push((name, entry));
        } else if name == ENABLE_MARKER {
            has_marker = true;
        } else if entry_point.is_none() && is_entry_point(&name) {
            entry_point = Some(entry);
        }
    }

    if entry_point.is_none() && dirs.is_empty() {
        return None;
    }

    if !include_disabled && depth == 1 && !has_marker {
        tracing::debug!("Skipping disabled command {}", path.display());
        return None;
    }

    let children = dirs
        .into_iter()
        .filter_map(|(name, dir)| {
            scan(&dir, depth + 1, include_disabled).map(|node| (name, node))
        })
        .collect();

    Some(CommandNode {
        name: basename(path),
        path: path.to_path_buf(),
        entry_point,
        children,
    })
}

/// Whether a file name is a package entry point.
pub fn is_entry_point(file_name: &str) -> bool {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem == ENTRY_POINT_STEM)
}

fn sorted_entries(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(path)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect::<Vec<_>>();
    entries.sort();
    Ok(entries)
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
