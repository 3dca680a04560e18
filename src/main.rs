//! dts CLI entry point.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use dtshell::cli::{self, Cli};
use dtshell::commands::PluginRegistry;
use dtshell::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("dtshell=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dtshell=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("dts starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let interactive = cli.one_shot().is_none() && std::io::stdin().is_terminal();
    let ui = create_ui(interactive, output_mode);

    let result = cli::run(&cli, PluginRegistry::new(), ui);
    ExitCode::from(result.exit_code.clamp(0, 255) as u8)
}
