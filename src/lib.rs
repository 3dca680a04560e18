//! dtshell - an extensible command shell.
//!
//! The shell discovers command packages installed as directories under a
//! commands root, loads them into a tree of commands with subcommands, and
//! binds each top-level command to the interactive loop's execution,
//! completion and help hooks. The commands root is a git checkout kept in
//! step with a remote repository.
//!
//! # Modules
//!
//! - [`cli`] - Argument parsing and application assembly
//! - [`commands`] - Command discovery, loading and dispatch
//! - [`config`] - Paths, persisted settings and remote settings
//! - [`error`] - Error types and result aliases
//! - [`shell`] - Shell state, built-ins and the interactive loop
//! - [`sync`] - Git synchronization of the commands root
//! - [`ui`] - Terminal output, spinners and test doubles
//!
//! # Example
//!
//! ```
//! use dtshell::commands::{scan_root, ENABLE_MARKER};
//!
//! let root = tempfile::tempdir().unwrap();
//! let pkg = root.path().join("hello");
//! std::fs::create_dir_all(&pkg).unwrap();
//! std::fs::write(pkg.join("command.sh"), "#!/bin/sh\necho hello\n").unwrap();
//!
//! // Not enabled yet
//! assert!(scan_root(root.path(), false).unwrap().children.is_empty());
//!
//! std::fs::write(pkg.join(ENABLE_MARKER), "").unwrap();
//! let tree = scan_root(root.path(), false).unwrap();
//! assert!(tree.children.contains_key("hello"));
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod shell;
pub mod sync;
pub mod ui;

pub use error::{Result, ShellError};
