//! The loaded command object graph.
//!
//! A [`Command`] wraps either a concrete implementation of the
//! [`CommandImpl`] capability set or a placeholder, and owns its
//! subcommands. Routing to subcommands happens here, so implementations
//! only ever see the arguments meant for them.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::shell::Shell;

/// Capability set every concrete command provides.
pub trait CommandImpl {
    /// Run the command with the arguments following its name.
    fn execute(&self, shell: &mut Shell, args: &[String]) -> Result<CommandResult>;

    /// Offer completions for the partial `word` spanning `begin..end` of `line`.
    fn complete(
        &self,
        _shell: &Shell,
        _word: &str,
        _line: &str,
        _begin: usize,
        _end: usize,
    ) -> Vec<String> {
        Vec::new()
    }

    /// Print help for the command.
    fn describe(&self, shell: &mut Shell);
}

/// Result of command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Build a result from a process exit code (`None` when killed by a signal).
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::success(),
            Some(code) => Self::failure(code),
            None => Self::failure(1),
        }
    }
}

/// What a command resolved to.
pub enum CommandKind {
    /// A resolved implementation.
    Concrete(Box<dyn CommandImpl>),
    /// Resolution failed, or the package is a pure container.
    Placeholder,
}

impl std::fmt::Debug for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Concrete(_) => f.write_str("Concrete"),
            Self::Placeholder => f.write_str("Placeholder"),
        }
    }
}

/// A loaded command and its subcommands.
#[derive(Debug)]
pub struct Command {
    name: String,
    level: usize,
    path: String,
    kind: CommandKind,
    children: BTreeMap<String, Command>,
}

impl Command {
    /// Create a command without subcommands.
    pub fn new(name: &str, level: usize, path: &str, kind: CommandKind) -> Self {
        Self {
            name: name.to_string(),
            level,
            path: path.to_string(),
            kind,
            children: BTreeMap::new(),
        }
    }

    /// Attach a subcommand under its name.
    pub fn add_child(&mut self, child: Command) {
        self.children.insert(child.name.clone(), child);
    }

    /// Command name (package directory basename).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Depth in the tree (0 = top-level).
    pub fn level(&self) -> usize {
        self.level
    }

    /// Dotted package path, e.g. `commands.alpha.sub`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this command resolved to a placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, CommandKind::Placeholder)
    }

    /// Subcommands keyed by name.
    pub fn children(&self) -> &BTreeMap<String, Command> {
        &self.children
    }

    /// Look up a subcommand.
    pub fn child(&self, name: &str) -> Option<&Command> {
        self.children.get(name)
    }

    /// Run the command, routing to a subcommand when the first argument names one.
    pub fn execute(&self, shell: &mut Shell, args: &[String]) -> Result<CommandResult> {
        if let Some(child) = args.first().and_then(|first| self.children.get(first)) {
            return child.execute(shell, &args[1..]);
        }

        match &self.kind {
            CommandKind::Concrete(imp) => imp.execute(shell, args),
            CommandKind::Placeholder if self.children.is_empty() => {
                self.report_not_found(shell);
                Ok(CommandResult::failure(1))
            }
            CommandKind::Placeholder => {
                self.list_subcommands(shell);
                Ok(CommandResult::failure(1))
            }
        }
    }

    /// Offer completions for the partial `word` spanning `begin..end` of `line`.
    ///
    /// `line` starts with the top-level command name; words up to `begin`
    /// are used to walk down to the subcommand being completed.
    pub fn complete(
        &self,
        shell: &Shell,
        word: &str,
        line: &str,
        begin: usize,
        end: usize,
    ) -> Vec<String> {
        let head = line.get(..begin).unwrap_or(line);
        let typed: Vec<&str> = head.split_whitespace().collect();
        let own_position = self.level + 1;

        if typed.len() > own_position {
            if let Some(child) = self.children.get(typed[own_position]) {
                return child.complete(shell, word, line, begin, end);
            }
        }

        let mut candidates = Vec::new();
        if typed.len() == own_position {
            candidates.extend(
                self.children
                    .keys()
                    .filter(|name| name.starts_with(word))
                    .cloned(),
            );
        }
        if let CommandKind::Concrete(imp) = &self.kind {
            candidates.extend(imp.complete(shell, word, line, begin, end));
        }
        candidates
    }

    /// Print help for the command.
    pub fn describe(&self, shell: &mut Shell) {
        match &self.kind {
            CommandKind::Concrete(imp) => {
                imp.describe(shell);
                if !self.children.is_empty() {
                    self.list_subcommands(shell);
                }
            }
            CommandKind::Placeholder if self.children.is_empty() => self.report_not_found(shell),
            CommandKind::Placeholder => self.list_subcommands(shell),
        }
    }

    fn report_not_found(&self, shell: &mut Shell) {
        shell
            .ui()
            .error(&format!("Command `{}` not found.", self.name));
    }

    fn list_subcommands(&self, shell: &mut Shell) {
        let ui = shell.ui();
        ui.message(&format!("Subcommands of `{}`:", self.name));
        for name in self.children.keys() {
            ui.message(&format!("  {}", name));
        }
    }
}
