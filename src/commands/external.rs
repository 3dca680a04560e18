//! Commands implemented by an executable entry point on disk.
//!
//! The entry point is run directly with the command's arguments. Completion
//! and help requests run the same file with a request variable set and read
//! its stdout, but only when the package's [`PackageManifest`] declares that
//! the entry point answers them:
//!
//! | Request    | Variables                                                    |
//! |------------|--------------------------------------------------------------|
//! | execute    | `DTS_COMMAND`, `DTS_COMMANDS_ROOT`                           |
//! | complete   | `DTS_COMPLETE=1`, `DTS_COMP_WORD`, `DTS_COMP_LINE`, `DTS_COMP_BEGIN`, `DTS_COMP_END` |
//! | describe   | `DTS_DESCRIBE=1`                                             |

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::command::{CommandImpl, CommandResult};
use super::manifest::PackageManifest;
use crate::error::{Result, ShellError};
use crate::shell::Shell;

/// A command backed by an executable `command.*` file.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    name: String,
    package_path: String,
    entry_point: PathBuf,
    manifest: PackageManifest,
}

impl ExternalCommand {
    /// Create a command for an entry point with its declared capabilities.
    pub fn new(
        name: &str,
        package_path: &str,
        entry_point: PathBuf,
        manifest: PackageManifest,
    ) -> Self {
        Self {
            name: name.to_string(),
            package_path: package_path.to_string(),
            entry_point,
            manifest,
        }
    }

    /// The entry-point file.
    pub fn entry_point(&self) -> &Path {
        &self.entry_point
    }

    fn base_command(&self, shell: &Shell) -> Command {
        let mut cmd = Command::new(&self.entry_point);
        if let Some(dir) = self.entry_point.parent() {
            cmd.current_dir(dir);
        }
        cmd.env("DTS_COMMAND", &self.package_path);
        cmd.env("DTS_COMMANDS_ROOT", shell.paths().commands());
        cmd
    }

    /// Run the entry point for a request and capture its stdout.
    fn query(&self, shell: &Shell, env: &[(&str, String)]) -> Option<String> {
        let mut cmd = self.base_command(shell);
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null()).stderr(Stdio::null());

        match cmd.output() {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                tracing::debug!(
                    "{} exited with {:?} during query",
                    self.entry_point.display(),
                    output.status.code()
                );
                None
            }
            Err(e) => {
                tracing::debug!("Failed to query {}: {}", self.entry_point.display(), e);
                None
            }
        }
    }
}

impl CommandImpl for ExternalCommand {
    fn execute(&self, shell: &mut Shell, args: &[String]) -> Result<CommandResult> {
        tracing::debug!("Running {} {:?}", self.entry_point.display(), args);

        let status = self
            .base_command(shell)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ShellError::SpawnFailed {
                command: self.name.clone(),
                message: e.to_string(),
            })?;

        Ok(CommandResult::from_exit_code(status.code()))
    }

    fn complete(
        &self,
        shell: &Shell,
        word: &str,
        line: &str,
        begin: usize,
        end: usize,
    ) -> Vec<String> {
        if !self.manifest.complete {
            return Vec::new();
        }

        let env = [
            ("DTS_COMPLETE", "1".to_string()),
            ("DTS_COMP_WORD", word.to_string()),
            ("DTS_COMP_LINE", line.to_string()),
            ("DTS_COMP_BEGIN", begin.to_string()),
            ("DTS_COMP_END", end.to_string()),
        ];

        self.query(shell, &env)
            .map(|out| {
                out.lines()
                    .map(str::trim)
                    .filter(|c| !c.is_empty() && c.starts_with(word))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn describe(&self, shell: &mut Shell) {
        if let Some(description) = &self.manifest.description {
            shell.ui().message(description);
            return;
        }

        let help = if self.manifest.describe {
            self.query(shell, &[("DTS_DESCRIBE", "1".to_string())])
        } else {
            None
        };
        match help {
            Some(help) if !help.trim().is_empty() => shell.ui().message(help.trim_end()),
            _ => shell
                .ui()
                .message(&format!("No help available for `{}`.", self.name)),
        }
    }
}
