//! Entry-point resolution.
//!
//! A command package's dotted path (`commands.alpha.command`) resolves to a
//! concrete implementation in one of two ways:
//!
//! 1. A factory registered for that path (commands compiled into the host)
//! 2. The package's executable `command.*` file (commands installed on disk),
//!    limited to the requests its [`PackageManifest`] declares
//!
//! Anything else is a [`ResolveError`]; the loader downgrades it to a
//! placeholder.

use std::collections::HashMap;
use std::path::Path;

use super::command::CommandImpl;
use super::external::ExternalCommand;
use super::manifest::PackageManifest;
use super::scanner::{CommandNode, ENTRY_POINT_STEM};
use crate::error::ResolveError;

/// Builds a command implementation compiled into the host.
pub type CommandFactory = fn() -> anyhow::Result<Box<dyn CommandImpl>>;

/// Table of statically known command factories, keyed by dotted path.
#[derive(Default)]
pub struct PluginRegistry {
    factories: HashMap<String, CommandFactory>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a package path (`commands.alpha`).
    ///
    /// The factory is stored under the entry-point path
    /// (`commands.alpha.command`).
    pub fn register(&mut self, package_path: &str, factory: CommandFactory) {
        self.factories
            .insert(entry_point_path(package_path), factory);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, package_path: &str, factory: CommandFactory) -> Self {
        self.register(package_path, factory);
        self
    }

    /// Whether a factory exists for the package path.
    pub fn contains(&self, package_path: &str) -> bool {
        self.factories.contains_key(&entry_point_path(package_path))
    }

    /// Resolve the implementation for a discovered package.
    pub fn resolve(
        &self,
        package_path: &str,
        node: &CommandNode,
    ) -> Result<Box<dyn CommandImpl>, ResolveError> {
        let key = entry_point_path(package_path);
        if let Some(factory) = self.factories.get(&key) {
            return factory().map_err(|e| ResolveError::FactoryFailed {
                name: key,
                message: e.to_string(),
            });
        }

        let entry = node
            .entry_point
            .as_deref()
            .ok_or_else(|| ResolveError::MissingEntryPoint {
                path: node.path.clone(),
            })?;

        if !is_executable(entry) {
            return Err(ResolveError::NotExecutable {
                path: entry.to_path_buf(),
            });
        }

        let manifest = PackageManifest::load(&node.path)?;

        Ok(Box::new(ExternalCommand::new(
            &node.name,
            package_path,
            entry.to_path_buf(),
            manifest,
        )))
    }
}

/// Dotted path of a package's entry point.
pub fn entry_point_path(package_path: &str) -> String {
    format!("{}.{}", package_path, ENTRY_POINT_STEM)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| matches!(ext, "exe" | "bat" | "cmd"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::command::CommandResult;
    use crate::shell::Shell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Hello;

    impl CommandImpl for Hello {
        fn execute(&self, shell: &mut Shell, _args: &[String]) -> crate::Result<CommandResult> {
            shell.ui().message("hello");
            Ok(CommandResult::success())
        }

        fn describe(&self, shell: &mut Shell) {
            shell.ui().message("Says hello");
        }
    }

    fn hello() -> anyhow::Result<Box<dyn CommandImpl>> {
        Ok(Box::new(Hello))
    }

    fn broken() -> anyhow::Result<Box<dyn CommandImpl>> {
        anyhow::bail!("missing dependency")
    }

    fn node(dir: &Path, entry: Option<PathBuf>) -> CommandNode {
        CommandNode {
            name: "alpha".into(),
            path: dir.to_path_buf(),
            entry_point: entry,
            children: Default::default(),
        }
    }

    #[test]
    fn entry_point_path_appends_stem() {
        assert_eq!(entry_point_path("commands.alpha"), "commands.alpha.command");
    }

    #[test]
    fn registered_factory_wins() {
        let temp = TempDir::new().unwrap();
        let plugins = PluginRegistry::new().with("commands.alpha", hello);

        assert!(plugins.contains("commands.alpha"));
        assert!(plugins
            .resolve("commands.alpha", &node(temp.path(), None))
            .is_ok());
    }

    #[test]
    fn failing_factory_is_resolve_error() {
        let temp = TempDir::new().unwrap();
        let plugins = PluginRegistry::new().with("commands.alpha", broken);

        let err = plugins
            .resolve("commands.alpha", &node(temp.path(), None))
            .err()
            .unwrap();

        assert!(matches!(err, ResolveError::FactoryFailed { .. }));
        assert!(err.to_string().contains("missing dependency"));
    }

    #[test]
    fn missing_entry_point_is_resolve_error() {
        let temp = TempDir::new().unwrap();
        let err = PluginRegistry::new()
            .resolve("commands.alpha", &node(temp.path(), None))
            .err()
            .unwrap();

        assert!(matches!(err, ResolveError::MissingEntryPoint { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_entry_point_is_resolve_error() {
        let temp = TempDir::new().unwrap();
        let entry = temp.path().join("command.py");
        fs::write(&entry, "class DTCommand: pass\n").unwrap();

        let err = PluginRegistry::new()
            .resolve("commands.alpha", &node(temp.path(), Some(entry)))
            .err()
            .unwrap();

        assert!(matches!(err, ResolveError::NotExecutable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn executable_entry_point_resolves() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let entry = temp.path().join("command.sh");
        fs::write(&entry, "#!/bin/sh\necho hi\n").unwrap();
        fs::set_permissions(&entry, fs::Permissions::from_mode(0o755)).unwrap();

        let resolved = PluginRegistry::new().resolve("commands.alpha", &node(temp.path(), Some(entry)));

        assert!(resolved.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn malformed_manifest_is_resolve_error() {
        use crate::commands::MANIFEST_FILE;
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let entry = temp.path().join("command.sh");
        fs::write(&entry, "#!/bin/sh\necho hi\n").unwrap();
        fs::set_permissions(&entry, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(temp.path().join(MANIFEST_FILE), "{").unwrap();

        let err = PluginRegistry::new()
            .resolve("commands.alpha", &node(temp.path(), Some(entry)))
            .err()
            .unwrap();

        assert!(matches!(err, ResolveError::InvalidManifest { .. }));
    }
}
