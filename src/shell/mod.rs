//! The shell application state and its command lifecycle.
//!
//! [`Shell`] owns everything a session needs: paths, persisted config, the
//! plugin table, the sync manager, the current command [`Registry`] and the
//! [`Bindings`] the dispatch loop consults. Commands receive it by `&mut`.

pub mod builtins;
pub mod editor;
pub mod repl;

use std::fs;

use crate::commands::{self, Bindings, CommandResult, PluginRegistry, Registry, CORE_COMMANDS};
use crate::config::{ShellConfig, ShellPaths};
use crate::error::{Result, ShellError};
use crate::sync::{OutdatedCheck, SyncManager};
use crate::ui::UserInterface;

pub use builtins::Builtin;
pub use editor::{LineCompleter, LineEditor, PipedEditor, ScriptedEditor, TerminalEditor};
pub use repl::{intro, run_interactive, ShellCompleter, PROMPT};

/// Product name shown in the banner and by `version`.
pub const NAME: &str = "Duckietown Shell";

/// Shell version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Running shell session.
pub struct Shell {
    paths: ShellPaths,
    config: ShellConfig,
    plugins: PluginRegistry,
    sync: Option<SyncManager>,
    ui: Box<dyn UserInterface>,
    registry: Registry,
    bindings: Bindings,
    exit_requested: bool,
}

impl Shell {
    /// Create a shell with no commands loaded yet.
    ///
    /// Pass `None` for `sync` when the commands root is not a managed
    /// checkout.
    pub fn new(
        paths: ShellPaths,
        config: ShellConfig,
        plugins: PluginRegistry,
        sync: Option<SyncManager>,
        ui: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            paths,
            config,
            plugins,
            sync,
            ui,
            registry: Registry::empty(),
            bindings: Bindings::new(),
            exit_requested: false,
        }
    }

    /// User-facing output.
    pub fn ui(&mut self) -> &mut dyn UserInterface {
        self.ui.as_mut()
    }

    pub fn paths(&self) -> &ShellPaths {
        &self.paths
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ShellConfig {
        &mut self.config
    }

    /// The loaded command generation.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Currently bound top-level commands.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Whether `exit` was requested.
    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }

    /// Stop the interactive loop after the current command.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Prepare the commands directory and load commands.
    ///
    /// An externally managed commands root (see
    /// [`ShellPaths::commands_overridden`]) is never initialized or checked
    /// for updates. Sync failures are reported and the shell starts with
    /// whatever is on disk.
    pub fn startup(&mut self) -> Result<()> {
        let commands = self.paths.commands();
        if commands.is_file() {
            tracing::warn!("Removing stray file at {}", commands.display());
            fs::remove_file(commands)?;
        }

        let managed = !self.paths.commands_overridden();
        let mut first_init = false;

        if managed {
            if let Some(sync) = self.sync.as_mut() {
                match sync.ensure_initialized(self.ui.as_mut()) {
                    Ok(initialized) => first_init = initialized,
                    Err(ShellError::RemoteUnreachable { .. }) => {}
                    Err(e) => self.ui.error(&e.to_string()),
                }
            }
        }

        self.reload();

        if managed && !first_init {
            if let Some(sync) = self.sync.as_ref() {
                let check = sync.check_outdated(self.ui.as_mut());
                tracing::debug!("Update check: {:?}", check);
            }
        }

        Ok(())
    }

    /// Rediscover commands and rebuild the bindings.
    ///
    /// Every binding of the previous generation is removed first, so
    /// packages that disappeared or were disabled stop being callable.
    pub fn reload(&mut self) {
        self.registry.unbind_all(&mut self.bindings);

        match Registry::discover(&self.plugins, self.paths.commands()) {
            Some(registry) if !registry.is_empty() => {
                registry.bind_all(&mut self.bindings);
                tracing::debug!("Loaded {} commands", registry.len());
                self.registry = registry;
            }
            _ => {
                self.ui.warning("No commands found.");
                self.registry = Registry::empty();
            }
        }
    }

    /// Mark a package enabled. Takes effect on the next [`reload`](Self::reload).
    pub fn enable(&self, name: &str) -> Result<bool> {
        commands::enable(self.paths.commands(), name)
    }

    /// Mark a package disabled. Takes effect on the next [`reload`](Self::reload).
    pub fn disable(&self, name: &str) -> Result<bool> {
        commands::disable(self.paths.commands(), name)
    }

    /// Pull the latest commands and reload them.
    ///
    /// Returns `false` when the commands root is not a managed checkout.
    pub fn update_commands(&mut self) -> Result<bool> {
        if self.paths.commands_overridden() {
            return Ok(false);
        }
        let Some(sync) = self.sync.as_mut() else {
            return Ok(false);
        };
        sync.update(self.ui.as_mut())?;
        self.reload();
        Ok(true)
    }

    /// Compare the checkout with the remote tip.
    pub fn check_outdated(&mut self) -> OutdatedCheck {
        match self.sync.as_ref() {
            Some(sync) if !self.paths.commands_overridden() => {
                sync.check_outdated(self.ui.as_mut())
            }
            _ => OutdatedCheck::Skipped,
        }
    }

    /// Run one input line.
    ///
    /// Built-ins take precedence over discovered commands. Empty lines do
    /// nothing.
    pub fn run_line(&mut self, line: &str) -> Result<CommandResult> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(CommandResult::success());
        }

        let (name, rest) = split_command(line);

        if let Some(builtin) = Builtin::from_name(name) {
            return builtin.run(self, &commands::split_args(rest));
        }

        match self.bindings.get(name) {
            Some(hooks) => (hooks.execute)(self, rest),
            None => Err(ShellError::UnknownCommand {
                name: name.to_string(),
            }),
        }
    }

    /// Print help for a built-in or bound command.
    pub fn help(&mut self, name: &str) -> Result<CommandResult> {
        if let Some(builtin) = Builtin::from_name(name) {
            self.ui.message(builtin.summary());
            return Ok(CommandResult::success());
        }

        match self.bindings.get(name) {
            Some(hooks) => {
                (hooks.help)(self);
                Ok(CommandResult::success())
            }
            None => Err(ShellError::UnknownCommand {
                name: name.to_string(),
            }),
        }
    }

    /// Completion candidates for the last word of a partial line.
    pub fn complete_line(&self, line: &str) -> Vec<String> {
        let word = line.rsplit(char::is_whitespace).next().unwrap_or("");
        let begin = line.len() - word.len();
        let end = line.len();

        let head = line[..begin].trim_start();
        if head.is_empty() {
            return self.complete_command_name(word);
        }

        let (name, _) = split_command(head);
        if let Some(builtin) = Builtin::from_name(name) {
            return builtin.complete(self, word, line, begin, end);
        }
        match self.bindings.get(name) {
            Some(hooks) => (hooks.complete)(self, word, line, begin, end),
            None => Vec::new(),
        }
    }

    /// Built-in and bound names starting with `prefix`.
    pub fn complete_command_name(&self, prefix: &str) -> Vec<String> {
        let mut names: Vec<String> = CORE_COMMANDS
            .iter()
            .copied()
            .chain(self.bindings.names())
            .filter(|name| name.starts_with(prefix))
            .map(String::from)
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Split a trimmed line into the command name and the raw remainder.
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (line, ""),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::commands::CommandImpl;
    use tempfile::TempDir;

    struct Echo;

    impl CommandImpl for Echo {
        fn execute(&self, shell: &mut Shell, args: &[String]) -> Result<CommandResult> {
            shell.ui().message(&format!("echo {}", args.join(" ")));
            Ok(CommandResult::success())
        }

        fn complete(
            &self,
            _shell: &Shell,
            word: &str,
            _line: &str,
            _begin: usize,
            _end: usize,
        ) -> Vec<String> {
            ["--loud", "--quiet"]
                .iter()
                .filter(|c| c.starts_with(word))
                .map(|c| c.to_string())
                .collect()
        }

        fn describe(&self, shell: &mut Shell) {
            shell.ui().message("Echo the arguments");
        }
    }

    fn echo() -> anyhow::Result<Box<dyn CommandImpl>> {
        Ok(Box::new(Echo))
    }

    fn shell_with_echo(temp: &TempDir) -> (Shell, crate::ui::MockUI) {
        let (mut shell, ui) = shell_in(temp);
        shell.plugins = PluginRegistry::new().with("commands.echo", echo);
        script_package(shell.paths().commands(), "echo", true, "");
        (shell, ui)
    }

    #[test]
    fn split_command_separates_name() {
        assert_eq!(split_command("echo a  b"), ("echo", "a  b"));
        assert_eq!(split_command("echo"), ("echo", ""));
    }

    #[test]
    fn empty_root_warns_and_binds_nothing() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);

        shell.reload();

        assert!(ui.has_warning("No commands found."));
        assert!(shell.registry().is_empty());
        assert!(shell.bindings().is_empty());
    }

    #[test]
    fn reload_binds_exactly_registry_keys() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_in(&temp);
        let commands = shell.paths().commands().to_path_buf();
        script_package(&commands, "alpha", true, "");
        script_package(&commands, "beta", true, "");

        shell.reload();
        assert_eq!(shell.bindings().names(), shell.registry().names());

        fs::remove_dir_all(commands.join("beta")).unwrap();
        shell.reload();

        assert_eq!(shell.bindings().names(), vec!["alpha"]);
        assert_eq!(shell.registry().names(), vec!["alpha"]);
    }

    #[test]
    fn registered_command_runs_with_args() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_with_echo(&temp);
        shell.reload();

        let result = shell.run_line("  echo hello   world ").unwrap();

        assert!(result.success);
        assert!(ui.has_message("echo hello world"));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_in(&temp);

        let err = shell.run_line("ghost").unwrap_err();

        assert!(matches!(err, ShellError::UnknownCommand { name } if name == "ghost"));
    }

    #[test]
    fn empty_line_is_ignored() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);

        assert!(shell.run_line("   ").unwrap().success);
        assert!(ui.messages().is_empty());
    }

    #[test]
    fn completes_command_names() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_with_echo(&temp);
        shell.reload();

        assert_eq!(shell.complete_line("e"), vec!["echo", "exit"]);
        assert_eq!(shell.complete_line("ver"), vec!["version"]);
    }

    #[test]
    fn completes_command_arguments() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_with_echo(&temp);
        shell.reload();

        assert_eq!(shell.complete_line("echo --l"), vec!["--loud"]);
        assert!(shell.complete_line("ghost --l").is_empty());
    }

    #[test]
    fn help_runs_bound_help_hook() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_with_echo(&temp);
        shell.reload();

        shell.help("echo").unwrap();

        assert!(ui.has_message("Echo the arguments"));
        assert!(shell.help("ghost").is_err());
    }

    #[test]
    fn enable_disable_apply_on_reload() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_in(&temp);
        let commands = shell.paths().commands().to_path_buf();
        script_package(&commands, "alpha", true, "");
        script_package(&commands, "beta", false, "");
        shell.reload();
        assert!(!shell.bindings().contains("beta"));

        assert!(shell.enable("beta").unwrap());
        assert!(!shell.bindings().contains("beta"));
        shell.reload();
        assert!(shell.bindings().contains("beta"));

        assert!(shell.disable("beta").unwrap());
        shell.reload();
        assert!(!shell.bindings().contains("beta"));
    }

    #[test]
    fn startup_removes_stray_commands_file() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);
        let commands = shell.paths().commands().to_path_buf();
        fs::remove_dir_all(&commands).unwrap();
        fs::write(&commands, "oops").unwrap();

        shell.startup().unwrap();

        assert!(!commands.exists());
        assert!(ui.has_warning("No commands found."));
    }

    #[test]
    fn overridden_root_is_never_synced() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_in(&temp);

        assert!(!shell.update_commands().unwrap());
        assert_eq!(shell.check_outdated(), OutdatedCheck::Skipped);
    }

    mod managed {
        use super::*;
        use crate::config::RemoteSettings;
        use crate::sync::cache::backdate;
        use crate::sync::git::test_support::{create_bare_repo, GIT_LOCK};
        use crate::sync::{RemoteProbe, UpdatesCache};
        use crate::ui::MockUI;
        use std::cell::Cell;
        use std::path::Path;
        use std::rc::Rc;
        use std::time::Duration;

        struct CountingProbe {
            calls: Rc<Cell<usize>>,
        }

        impl RemoteProbe for CountingProbe {
            fn latest_revision(&self) -> anyhow::Result<String> {
                self.calls.set(self.calls.get() + 1);
                Ok("remote-tip".to_string())
            }
        }

        /// A shell whose commands root is the managed default under
        /// `<temp>/root`, synced from `remote`.
        fn managed_shell(temp: &TempDir, remote: &Path) -> (Shell, MockUI, Rc<Cell<usize>>) {
            let paths = ShellPaths::new(temp.path().join("root"), None);
            let calls = Rc::new(Cell::new(0));
            let sync = SyncManager::new(
                &paths,
                RemoteSettings::for_remote(&remote.to_string_lossy(), "main"),
            )
            .with_probe(Box::new(CountingProbe {
                calls: Rc::clone(&calls),
            }));
            let ui = MockUI::new();
            let shell = Shell::new(
                paths.clone(),
                ShellConfig::empty(paths.config_file()),
                PluginRegistry::new(),
                Some(sync),
                Box::new(ui.clone()),
            );
            (shell, ui, calls)
        }

        #[test]
        fn first_startup_initializes_without_update_check() {
            let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let temp = TempDir::new().unwrap();
            let bare = create_bare_repo(temp.path());
            let (mut shell, ui, calls) = managed_shell(&temp, &bare);

            shell.startup().unwrap();

            assert!(temp.path().join("root/commands/.git").exists());
            assert!(shell.registry().contains("hello"));
            assert_eq!(calls.get(), 0);
            assert!(ui.warnings().is_empty());
        }

        #[test]
        fn later_startup_checks_for_updates() {
            let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let temp = TempDir::new().unwrap();
            let bare = create_bare_repo(temp.path());
            let (mut first, _ui, _calls) = managed_shell(&temp, &bare);
            first.startup().unwrap();

            let cache = UpdatesCache::new(first.paths().updates_check_file());
            cache.write("stale-tip").unwrap();
            backdate(cache.path(), Duration::from_secs(11 * 60));

            let (mut second, ui, calls) = managed_shell(&temp, &bare);
            second.startup().unwrap();

            assert_eq!(calls.get(), 1);
            assert!(ui.has_warning("Run `update`"));
            assert_eq!(cache.read().unwrap().remote, "remote-tip");

            let (mut third, _ui, calls) = managed_shell(&temp, &bare);
            third.startup().unwrap();
            assert_eq!(calls.get(), 0);
        }

        #[test]
        fn unreachable_remote_still_starts_the_shell() {
            let _lock = GIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let temp = TempDir::new().unwrap();
            let missing = temp.path().join("missing.git");
            let (mut shell, ui, calls) = managed_shell(&temp, &missing);

            shell.startup().unwrap();

            assert!(ui.has_error(&missing.to_string_lossy()));
            assert!(ui.has_warning("No commands found."));
            assert_eq!(calls.get(), 0);
        }
    }
}
