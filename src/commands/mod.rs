//! Command discovery, loading and dispatch.
//!
//! Installed command packages live under the commands root as directories:
//!
//! ```text
//! commands/
//! ├── lib/                  # shared support code, never a command
//! ├── alpha/
//! │   ├── installed.flag    # enables the package
//! │   ├── command.sh        # entry point
//! │   ├── dts.json          # optional manifest
//! │   └── sub/
//! │       └── command.sh
//! └── beta/                 # no marker: disabled
//!     └── command.sh
//! ```
//!
//! [`scanner`] discovers the tree, [`loader`] resolves each package through
//! the [`PluginRegistry`] into a [`Command`], and [`binder`] exposes the
//! top-level commands to the shell.

pub mod binder;
pub mod command;
pub mod external;
pub mod loader;
pub mod manifest;
pub mod plugin;
pub mod registry;
pub mod scanner;

pub use binder::{split_args, Bindings, Hooks};
pub use command::{Command, CommandImpl, CommandKind, CommandResult};
pub use external::ExternalCommand;
pub use loader::{load, load_top_level, ROOT_PACKAGE};
pub use manifest::{PackageManifest, MANIFEST_FILE};
pub use plugin::{CommandFactory, PluginRegistry};
pub use registry::{
    disable, enable, is_core_command, known_commands, Registry, CORE_COMMANDS,
};
pub use scanner::{scan, scan_root, CommandNode, ENABLE_MARKER, ENTRY_POINT_STEM};
