//! Turns discovered packages into loaded commands.
//!
//! Loading never fails. Only packages carrying an entry-point file are
//! resolved; pure container directories become placeholders that still
//! route to their subcommands, and any resolution failure is logged and
//! downgraded to a placeholder.

use super::command::{Command, CommandKind};
use super::plugin::PluginRegistry;
use super::scanner::CommandNode;

/// Dotted path of the commands root package.
pub const ROOT_PACKAGE: &str = "commands";

/// Load a top-level package found under the commands root.
pub fn load_top_level(plugins: &PluginRegistry, node: &CommandNode) -> Command {
    load(plugins, ROOT_PACKAGE, node, 0)
}

/// Load the package `node`, whose parent package path is `parent_path`,
/// at `depth`, recursing into its subpackages.
pub fn load(plugins: &PluginRegistry, parent_path: &str, node: &CommandNode, depth: usize) -> Command {
    let path = format!("{}.{}", parent_path, node.name);

    let kind = if node.entry_point.is_none() && !plugins.contains(&path) {
        tracing::debug!("{} is a container, not resolving", path);
        CommandKind::Placeholder
    } else {
        match plugins.resolve(&path, node) {
            Ok(imp) => CommandKind::Concrete(imp),
            Err(e) => {
                tracing::debug!("Failed to load {}: {}", path, e);
                CommandKind::Placeholder
            }
        }
    };

    let mut command = Command::new(&node.name, depth, &path, kind);
    for child in node.children.values() {
        command.add_child(load(plugins, &path, child, depth + 1));
    }
    command
}
