//! Shell configuration and on-disk layout.
//!
//! This module handles:
//! - The config root layout in [`paths`] (`~/.dt-shell/`, `commands/`,
//!   `commands/.updates-check`)
//! - The persisted JSON configuration object in [`store`]
//! - Commands-repository remote settings in [`remote`]
//!
//! # Example
//!
//! ```
//! use dtshell::config::{ShellConfig, ShellPaths};
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let paths = ShellPaths::new(temp.path().join(".dt-shell"), None);
//!
//! let mut config = ShellConfig::load_or_create(paths.config_file()).unwrap();
//! config.set("token_dt1", "dt1-abc");
//! config.save().unwrap();
//!
//! let reloaded = ShellConfig::load(paths.config_file()).unwrap();
//! assert_eq!(reloaded.token().unwrap(), "dt1-abc");
//! ```

pub mod paths;
pub mod remote;
pub mod store;

pub use paths::{ShellPaths, COMMANDS_ENV, ROOT_ENV};
pub use remote::RemoteSettings;
pub use store::{ShellConfig, TOKEN_KEY};
