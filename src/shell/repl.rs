//! The interactive read-dispatch loop.

use crate::commands::CommandResult;
use crate::error::Result;

use super::editor::{LineCompleter, LineEditor};
use super::{Shell, VERSION};

/// Prompt shown before each line.
pub const PROMPT: &str = "dt> ";

/// Banner printed when the interactive loop starts.
pub fn intro() -> String {
    format!(
        "Welcome to the Duckietown shell.\nVersion: {}\n\nType help to list commands.",
        VERSION
    )
}

/// Completes against the shell's built-ins and bound commands.
pub struct ShellCompleter<'a> {
    shell: &'a Shell,
}

impl<'a> ShellCompleter<'a> {
    pub fn new(shell: &'a Shell) -> Self {
        Self { shell }
    }
}

impl LineCompleter for ShellCompleter<'_> {
    fn complete(&self, line: &str) -> Vec<String> {
        self.shell.complete_line(line)
    }
}

/// Run one line, reporting errors instead of propagating them.
pub fn execute_line(shell: &mut Shell, line: &str) -> CommandResult {
    match shell.run_line(line) {
        Ok(result) => result,
        Err(e) => {
            shell.ui().error(&e.to_string());
            CommandResult::failure(1)
        }
    }
}

/// Read and run lines until `exit` or end of input.
pub fn run_interactive(shell: &mut Shell, editor: &mut dyn LineEditor) -> Result<()> {
    shell.ui().message(&intro());

    while !shell.should_exit() {
        let line = match editor.read_line(PROMPT, &ShellCompleter::new(shell))? {
            Some(line) => line,
            None => break,
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = execute_line(shell, line);
        tracing::debug!("`{}` finished with {:?}", line, result);
        shell.ui().message("");
    }

    Ok(())
}
