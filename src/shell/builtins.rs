//! Built-in commands.
//!
//! These are always available, take precedence over discovered packages and
//! cannot be enabled, disabled or shadowed.

use crate::commands::{known_commands, CommandResult, CORE_COMMANDS};
use crate::error::{Result, ShellError};

use super::{Shell, NAME, VERSION};

/// A built-in command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Commands,
    Install,
    Uninstall,
    Update,
    Version,
    Exit,
    Help,
    Config,
    Reload,
}

impl Builtin {
    /// Every built-in, in listing order.
    pub const ALL: [Builtin; 9] = [
        Builtin::Commands,
        Builtin::Install,
        Builtin::Uninstall,
        Builtin::Update,
        Builtin::Version,
        Builtin::Exit,
        Builtin::Help,
        Builtin::Config,
        Builtin::Reload,
    ];

    /// Look up a built-in by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Commands => "commands",
            Builtin::Install => "install",
            Builtin::Uninstall => "uninstall",
            Builtin::Update => "update",
            Builtin::Version => "version",
            Builtin::Exit => "exit",
            Builtin::Help => "help",
            Builtin::Config => "config",
            Builtin::Reload => "reload",
        }
    }

    /// One-line usage shown by `help`.
    pub fn summary(self) -> &'static str {
        match self {
            Builtin::Commands => "commands: list installed and available commands",
            Builtin::Install => "install <name>: enable an available command",
            Builtin::Uninstall => "uninstall <name>: disable an installed command",
            Builtin::Update => "update: download the latest commands",
            Builtin::Version => "version: show the shell version",
            Builtin::Exit => "exit: leave the shell",
            Builtin::Help => "help [name]: list commands or show help for one",
            Builtin::Config => "config [get <key> | set <key> <value>]: show or change settings",
            Builtin::Reload => "reload: rediscover commands on disk",
        }
    }

    /// Run the built-in with the words following its name.
    pub fn run(self, shell: &mut Shell, args: &[String]) -> Result<CommandResult> {
        match self {
            Builtin::Commands => list_commands(shell),
            Builtin::Install => install(shell, args),
            Builtin::Uninstall => uninstall(shell, args),
            Builtin::Update => update(shell),
            Builtin::Version => {
                shell.ui().message(&format!("{} {}", NAME, VERSION));
                Ok(CommandResult::success())
            }
            Builtin::Exit => {
                shell.request_exit();
                Ok(CommandResult::success())
            }
            Builtin::Help => match args.first() {
                Some(name) => shell.help(name),
                None => {
                    overview(shell);
                    Ok(CommandResult::success())
                }
            },
            Builtin::Config => config(shell, args),
            Builtin::Reload => {
                shell.reload();
                let count = shell.registry().len();
                if count > 0 {
                    shell.ui().success(&format!("Loaded {} commands", count));
                }
                Ok(CommandResult::success())
            }
        }
    }

    /// Completion candidates for the word being typed after the built-in.
    pub fn complete(
        self,
        shell: &Shell,
        word: &str,
        line: &str,
        begin: usize,
        _end: usize,
    ) -> Vec<String> {
        let position = line[..begin].split_whitespace().count();
        if position != 1 {
            if self == Builtin::Config && position == 2 {
                return matching(shell.config().keys(), word);
            }
            return Vec::new();
        }

        match self {
            Builtin::Help => shell.complete_command_name(word),
            Builtin::Install => {
                let available = known_commands(shell.paths().commands());
                matching(
                    available
                        .iter()
                        .map(String::as_str)
                        .filter(|name| !shell.registry().contains(name)),
                    word,
                )
            }
            Builtin::Uninstall => matching(shell.registry().names(), word),
            Builtin::Config => matching(["get", "set"], word),
            _ => Vec::new(),
        }
    }
}

fn matching<'a>(candidates: impl IntoIterator<Item = &'a str>, word: &str) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|c| c.starts_with(word))
        .map(String::from)
        .collect()
}

fn require_name<'a>(shell: &mut Shell, builtin: Builtin, args: &'a [String]) -> Option<&'a str> {
    let name = args.first().map(String::as_str);
    if name.is_none() {
        shell.ui().error(&format!("Usage: {}", builtin.summary()));
    }
    name
}

fn list_commands(shell: &mut Shell) -> Result<CommandResult> {
    let installed: Vec<String> = shell.registry().names().into_iter().map(String::from).collect();
    let available: Vec<String> = known_commands(shell.paths().commands())
        .into_iter()
        .filter(|name| !installed.contains(name) && !CORE_COMMANDS.contains(&name.as_str()))
        .collect();

    let ui = shell.ui();
    ui.show_header("Core commands:");
    for name in CORE_COMMANDS {
        ui.message(&format!("  {}", name));
    }

    ui.show_header("Installed commands:");
    if installed.is_empty() {
        ui.message("  (none)");
    }
    for name in &installed {
        ui.message(&format!("  {}", name));
    }

    if !available.is_empty() {
        ui.show_header("Available commands:");
        for name in &available {
            ui.message(&format!("  {}", name));
        }
    }

    Ok(CommandResult::success())
}

fn install(shell: &mut Shell, args: &[String]) -> Result<CommandResult> {
    let Some(name) = require_name(shell, Builtin::Install, args) else {
        return Ok(CommandResult::failure(2));
    };

    if Builtin::from_name(name).is_some() {
        shell
            .ui()
            .message(&format!("`{}` is a core command and is always installed.", name));
        return Ok(CommandResult::success());
    }

    if !shell.enable(name)? {
        shell.ui().error(&format!("Command `{}` not found.", name));
        return Ok(CommandResult::failure(1));
    }

    shell.reload();
    shell.ui().success(&format!("Command `{}` installed", name));
    Ok(CommandResult::success())
}

fn uninstall(shell: &mut Shell, args: &[String]) -> Result<CommandResult> {
    let Some(name) = require_name(shell, Builtin::Uninstall, args) else {
        return Ok(CommandResult::failure(2));
    };

    if Builtin::from_name(name).is_some() {
        shell
            .ui()
            .error(&format!("`{}` is a core command and cannot be uninstalled.", name));
        return Ok(CommandResult::failure(1));
    }

    if !shell.disable(name)? {
        shell.ui().error(&format!("Command `{}` not found.", name));
        return Ok(CommandResult::failure(1));
    }

    shell.reload();
    shell.ui().success(&format!("Command `{}` uninstalled", name));
    Ok(CommandResult::success())
}

fn update(shell: &mut Shell) -> Result<CommandResult> {
    match shell.update_commands() {
        Ok(true) => Ok(CommandResult::success()),
        Ok(false) => {
            let location = shell.paths().commands().display().to_string();
            shell.ui().warning(&format!(
                "Commands in {} are managed externally; nothing to update.",
                location
            ));
            Ok(CommandResult::success())
        }
        // already reported by the sync manager
        Err(ShellError::RemoteUnreachable { .. }) => Ok(CommandResult::failure(1)),
        Err(e) => Err(e),
    }
}

fn overview(shell: &mut Shell) {
    let bound: Vec<String> = shell.bindings().names().into_iter().map(String::from).collect();

    let ui = shell.ui();
    ui.show_header("Core commands:");
    for builtin in Builtin::ALL {
        ui.message(&format!("  {}", builtin.summary()));
    }
    if !bound.is_empty() {
        ui.show_header("Commands:");
        ui.message(&format!("  {}", bound.join("  ")));
    }
    ui.message("");
    ui.message("Type `help <name>` for help on a command.");
}

fn config(shell: &mut Shell, args: &[String]) -> Result<CommandResult> {
    let words: Vec<&str> = args.iter().map(String::as_str).collect();
    match words.as_slice() {
        [] => {
            let lines: Vec<String> = shell
                .config()
                .keys()
                .into_iter()
                .map(|key| format!("  {}", key))
                .collect();
            let ui = shell.ui();
            if lines.is_empty() {
                ui.message("No settings stored.");
            }
            for line in &lines {
                ui.message(line);
            }
            Ok(CommandResult::success())
        }
        ["get", key] => {
            let value = shell.config().require(key)?.to_string();
            shell.ui().message(&value);
            Ok(CommandResult::success())
        }
        ["set", key, value] => {
            shell.config_mut().set(key, value);
            shell.config().save()?;
            shell.ui().success(&format!("Set {}", key));
            Ok(CommandResult::success())
        }
        _ => {
            shell
                .ui()
                .error(&format!("Usage: {}", Builtin::Config.summary()));
            Ok(CommandResult::failure(2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::test_support::{script_package, shell_in};
    use crate::commands::ENABLE_MARKER;
    use std::fs;
    use tempfile::TempDir;

    fn run(shell: &mut Shell, line: &str) -> Result<CommandResult> {
        shell.run_line(line)
    }

    #[test]
    fn every_builtin_is_a_core_command() {
        let names: Vec<&str> = Builtin::ALL.iter().map(|b| b.name()).collect();
        assert_eq!(names, CORE_COMMANDS);
        for name in CORE_COMMANDS {
            assert_eq!(Builtin::from_name(name).map(Builtin::name), Some(*name));
        }
        assert!(Builtin::from_name("ghost").is_none());
    }

    #[test]
    fn version_prints_name_and_version() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);

        run(&mut shell, "version").unwrap();

        assert!(ui.has_message(&format!("Duckietown Shell {}", VERSION)));
    }

    #[test]
    fn exit_requests_stop() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_in(&temp);

        run(&mut shell, "exit").unwrap();

        assert!(shell.should_exit());
    }

    #[test]
    fn install_enables_and_reloads() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);
        let commands = shell.paths().commands().to_path_buf();
        script_package(&commands, "alpha", false, "");

        let result = run(&mut shell, "install alpha").unwrap();

        assert!(result.success);
        assert!(commands.join("alpha").join(ENABLE_MARKER).exists());
        assert!(shell.bindings().contains("alpha"));
        assert!(ui.has_success("Command `alpha` installed"));
    }

    #[test]
    fn install_unknown_fails() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);

        let result = run(&mut shell, "install ghost").unwrap();

        assert_eq!(result, CommandResult::failure(1));
        assert!(ui.has_error("Command `ghost` not found."));
    }

    #[test]
    fn install_without_name_shows_usage() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);

        assert_eq!(run(&mut shell, "install").unwrap(), CommandResult::failure(2));
        assert!(ui.has_error("Usage: install <name>"));
    }

    #[test]
    fn uninstall_disables_and_reloads() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_in(&temp);
        let commands = shell.paths().commands().to_path_buf();
        script_package(&commands, "alpha", true, "");
        shell.reload();

        run(&mut shell, "uninstall alpha").unwrap();

        assert!(!shell.bindings().contains("alpha"));
        assert!(commands.join("alpha").exists());
    }

    #[test]
    fn core_commands_cannot_be_uninstalled() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);

        let result = run(&mut shell, "uninstall help").unwrap();

        assert!(!result.success);
        assert!(ui.has_error("core command"));
    }

    #[test]
    fn commands_lists_installed_and_available() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);
        let commands = shell.paths().commands().to_path_buf();
        script_package(&commands, "alpha", true, "");
        script_package(&commands, "beta", false, "");
        shell.reload();

        run(&mut shell, "commands").unwrap();

        assert_eq!(
            ui.headers(),
            vec!["Core commands:", "Installed commands:", "Available commands:"]
        );
        assert!(ui.has_message("  alpha"));
        assert!(ui.has_message("  beta"));
    }

    #[test]
    fn update_on_external_root_warns() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);

        assert!(run(&mut shell, "update").unwrap().success);
        assert!(ui.has_warning("managed externally"));
    }

    #[test]
    fn config_set_persists_and_get_reads() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);
        fs::create_dir_all(shell.paths().root()).unwrap();

        run(&mut shell, "config set token_dt1 secret").unwrap();
        run(&mut shell, "config get token_dt1").unwrap();

        assert!(ui.has_message("secret"));
        let saved = fs::read_to_string(shell.paths().config_file()).unwrap();
        assert!(saved.contains("token_dt1"));
    }

    #[test]
    fn config_get_missing_key_is_actionable() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_in(&temp);

        let err = run(&mut shell, "config get token_dt1").unwrap_err();

        assert!(matches!(err, ShellError::MissingConfigKey { .. }));
    }

    #[test]
    fn help_lists_core_and_bound_commands() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);
        script_package(&shell.paths().commands().to_path_buf(), "alpha", true, "");
        shell.reload();

        run(&mut shell, "help").unwrap();

        assert!(ui.has_message("update: download the latest commands"));
        assert!(ui.has_message("alpha"));
    }

    #[test]
    fn help_for_builtin_prints_summary() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);

        run(&mut shell, "help install").unwrap();

        assert!(ui.has_message("install <name>"));
    }

    #[test]
    fn completes_install_and_uninstall_targets() {
        let temp = TempDir::new().unwrap();
        let (mut shell, _ui) = shell_in(&temp);
        let commands = shell.paths().commands().to_path_buf();
        script_package(&commands, "alpha", true, "");
        script_package(&commands, "avocado", false, "");
        shell.reload();

        assert_eq!(shell.complete_line("install a"), vec!["avocado"]);
        assert_eq!(shell.complete_line("uninstall a"), vec!["alpha"]);
        assert_eq!(shell.complete_line("config s"), vec!["set"]);
        assert!(shell.complete_line("version x").is_empty());
    }

    #[test]
    fn reload_reports_loaded_count() {
        let temp = TempDir::new().unwrap();
        let (mut shell, ui) = shell_in(&temp);
        script_package(&shell.paths().commands().to_path_buf(), "alpha", true, "");

        run(&mut shell, "reload").unwrap();

        assert!(ui.has_success("Loaded 1 commands"));
    }
}
