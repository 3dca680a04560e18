//! Command-line entry: builds the shell from arguments and runs it.
//!
//! - [`args`] - Argument definitions using clap's derive macros

pub mod args;

pub use args::Cli;

use std::io::{self, IsTerminal};

use crate::commands::{CommandResult, PluginRegistry};
use crate::config::{RemoteSettings, ShellConfig, ShellPaths};
use crate::error::{Result, ShellError};
use crate::shell::{repl, PipedEditor, Shell, TerminalEditor};
use crate::sync::SyncManager;
use crate::ui::UserInterface;

/// Resolve the on-disk layout and load (or create) the config file.
fn load_config(cli: &Cli) -> Result<(ShellPaths, ShellConfig)> {
    let root = cli.root.clone().unwrap_or_else(ShellPaths::default_root);
    let paths = ShellPaths::new(root, cli.commands.clone());
    tracing::debug!("Config root {}", paths.root().display());

    let config = ShellConfig::load_or_create(paths.config_file())?;
    Ok((paths, config))
}

/// A sync manager is attached only when the commands root is the managed
/// default.
fn assemble(
    paths: ShellPaths,
    config: ShellConfig,
    plugins: PluginRegistry,
    ui: Box<dyn UserInterface>,
) -> Shell {
    let sync = (!paths.commands_overridden())
        .then(|| SyncManager::new(&paths, RemoteSettings::from_config(&config)));
    Shell::new(paths, config, plugins, sync, ui)
}

/// Resolve paths and config and assemble a shell.
pub fn build_shell(cli: &Cli, plugins: PluginRegistry, ui: Box<dyn UserInterface>) -> Result<Shell> {
    let (paths, config) = load_config(cli)?;
    Ok(assemble(paths, config, plugins, ui))
}

/// Start the shell and run either the one-shot line or the interactive loop.
///
/// Errors that end the session are reported through `ui` and turn into a
/// failed result.
pub fn run(cli: &Cli, plugins: PluginRegistry, mut ui: Box<dyn UserInterface>) -> CommandResult {
    let (paths, config) = match load_config(cli) {
        Ok(loaded) => loaded,
        Err(e) => return report(ui.as_mut(), &e),
    };
    let mut shell = assemble(paths, config, plugins, ui);

    match session(&mut shell, cli) {
        Ok(result) => result,
        Err(e) => report(shell.ui(), &e),
    }
}

fn session(shell: &mut Shell, cli: &Cli) -> Result<CommandResult> {
    shell.startup()?;

    match cli.one_shot() {
        Some(line) => Ok(repl::execute_line(shell, &line)),
        None if io::stdin().is_terminal() => {
            repl::run_interactive(shell, &mut TerminalEditor::new())?;
            Ok(CommandResult::success())
        }
        None => {
            repl::run_interactive(shell, &mut PipedEditor::new(io::stdin().lock()))?;
            Ok(CommandResult::success())
        }
    }
}

fn report(ui: &mut dyn UserInterface, err: &ShellError) -> CommandResult {
    ui.error(&format!("Error: {}", err));
    CommandResult::failure(1)
}
