//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{COMMANDS_ENV, ROOT_ENV};

/// Duckietown Shell - an extensible command shell.
///
/// Without arguments, starts the interactive shell. With arguments, runs
/// them as a single command line and exits with its status.
#[derive(Debug, Parser)]
#[command(name = "dts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Config root (defaults to ~/.dt-shell)
    #[arg(long, env = ROOT_ENV, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Use an externally managed commands directory; disables syncing
    #[arg(long, env = COMMANDS_ENV, value_name = "PATH")]
    pub commands: Option<PathBuf>,

    /// Command line to run instead of starting the interactive shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub line: Vec<String>,
}

impl Cli {
    /// The one-shot command line, if any.
    pub fn one_shot(&self) -> Option<String> {
        (!self.line.is_empty()).then(|| self.line.join(" "))
    }
}
