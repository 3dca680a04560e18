//! The loaded command generation and enable/disable bookkeeping.
//!
//! A [`Registry`] is built from a fresh scan and load of the commands root
//! and replaced wholesale on reload. [`enable`] and [`disable`] toggle the
//! `installed.flag` marker of a top-level package; callers reload to observe
//! the effect.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::time::SystemTime;

use super::binder::Bindings;
use super::command::Command;
use super::loader::load_top_level;
use super::plugin::PluginRegistry;
use super::scanner::{scan_root, CommandNode, ENABLE_MARKER};
use crate::error::Result;

/// Built-in command names. They cannot be enabled, disabled or shadowed.
pub const CORE_COMMANDS: &[&str] = &[
    "commands",
    "install",
    "uninstall",
    "update",
    "version",
    "exit",
    "help",
    "config",
    "reload",
];

/// Whether `name` is a built-in command.
pub fn is_core_command(name: &str) -> bool {
    CORE_COMMANDS.contains(&name)
}

/// One generation of loaded top-level commands.
#[derive(Debug, Default)]
pub struct Registry {
    commands: BTreeMap<String, Rc<Command>>,
}

impl Registry {
    /// A registry with no commands.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every top-level package of a scanned root.
    ///
    /// Packages named after a built-in command are skipped.
    pub fn load(plugins: &PluginRegistry, root: &CommandNode) -> Self {
        let commands = root
            .children
            .values()
            .filter(|node| {
                let shadowing = is_core_command(&node.name);
                if shadowing {
                    tracing::debug!("Ignoring package {} named after a built-in", node.name);
                }
                !shadowing
            })
            .map(|node| (node.name.clone(), Rc::new(load_top_level(plugins, node))))
            .collect();
        Self { commands }
    }

    /// Scan and load the enabled packages under `commands_root`.
    ///
    /// Returns `None` when the scan finds nothing.
    pub fn discover(plugins: &PluginRegistry, commands_root: &Path) -> Option<Self> {
        scan_root(commands_root, false).map(|root| Self::load(plugins, &root))
    }

    /// Remove every binding this generation created.
    pub fn unbind_all(&self, bindings: &mut Bindings) {
        for name in self.commands.keys() {
            bindings.unbind(name);
        }
    }

    /// Bind every top-level command of this generation.
    pub fn bind_all(&self, bindings: &mut Bindings) {
        for command in self.commands.values() {
            bindings.bind(Rc::clone(command));
        }
    }

    /// Look up a top-level command.
    pub fn get(&self, name: &str) -> Option<&Rc<Command>> {
        self.commands.get(name)
    }

    /// Whether `name` is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Top-level names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Top-level commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values().map(|c| c.as_ref())
    }

    /// Number of top-level commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands are loaded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Names of every top-level package, enabled or not.
pub fn known_commands(commands_root: &Path) -> Vec<String> {
    scan_root(commands_root, true)
        .map(|root| root.children.into_keys().collect())
        .unwrap_or_default()
}

/// Enable a top-level package by creating its marker.
///
/// Core commands report success without effect. Returns `false` when no
/// package named `name` exists.
pub fn enable(commands_root: &Path, name: &str) -> Result<bool> {
    if is_core_command(name) {
        return Ok(true);
    }
    if !known_commands(commands_root).iter().any(|c| c == name) {
        return Ok(false);
    }
    touch(&commands_root.join(name).join(ENABLE_MARKER))?;
    tracing::debug!("Enabled command {}", name);
    Ok(true)
}

/// Disable a top-level package by removing its marker.
///
/// Core commands are always refused. Returns `false` when the command is
/// core or no package named `name` exists.
pub fn disable(commands_root: &Path, name: &str) -> Result<bool> {
    if is_core_command(name) {
        return Ok(false);
    }
    if !known_commands(commands_root).iter().any(|c| c == name) {
        return Ok(false);
    }
    match fs::remove_file(commands_root.join(name).join(ENABLE_MARKER)) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tracing::debug!("Disabled command {}", name);
    Ok(true)
}

fn touch(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.set_modified(SystemTime::now())
}
