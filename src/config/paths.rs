//! Config root discovery and the fixed file layout under it.
//!
//! Installed command packages depend on this layout, so the names here are
//! part of the shell's compatibility surface.

use std::path::{Path, PathBuf};

/// Environment variable redirecting the commands root.
///
/// A redirected root is managed externally and is never auto-synced.
pub const COMMANDS_ENV: &str = "DTSHELL_COMMANDS";

/// Environment variable redirecting the config root.
pub const ROOT_ENV: &str = "DTSHELL_ROOT";

/// Default config root, relative to the user's home directory.
const DEFAULT_ROOT: &str = ".dt-shell";

const CONFIG_FILE: &str = "config";
const COMMANDS_DIR: &str = "commands";
const UPDATES_CHECK_FILE: &str = ".updates-check";

/// Resolved locations of the shell's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellPaths {
    root: PathBuf,
    commands: PathBuf,
    commands_overridden: bool,
}

impl ShellPaths {
    /// Build paths for a config root, optionally redirecting the commands
    /// root to an externally managed directory.
    pub fn new(root: impl Into<PathBuf>, commands_override: Option<PathBuf>) -> Self {
        let root = root.into();
        match commands_override {
            Some(commands) => Self {
                root,
                commands,
                commands_overridden: true,
            },
            None => Self {
                commands: root.join(COMMANDS_DIR),
                root,
                commands_overridden: false,
            },
        }
    }

    /// The default config root (`~/.dt-shell`).
    ///
    /// Falls back to the current directory when no home directory exists.
    pub fn default_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_ROOT)
    }

    /// The config root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The persisted JSON config file.
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// The scanned commands root.
    pub fn commands(&self) -> &Path {
        &self.commands
    }

    /// The staleness cache file inside the commands root.
    pub fn updates_check_file(&self) -> PathBuf {
        self.commands.join(UPDATES_CHECK_FILE)
    }

    /// Whether the commands root was redirected away from the default.
    pub fn commands_overridden(&self) -> bool {
        self.commands_overridden
    }
}
