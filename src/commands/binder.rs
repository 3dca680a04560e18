//! Shell entry points for top-level commands.
//!
//! Each top-level [`Command`] is exposed to the shell as a [`Hooks`] triple
//! (execute, complete, help) in a [`Bindings`] table. The shell's dispatch
//! loop consults this table by command name; it is rebuilt on every reload.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::command::{Command, CommandResult};
use crate::error::Result;
use crate::shell::Shell;

/// Runs a command with the raw text following its name.
pub type ExecuteHook = Rc<dyn Fn(&mut Shell, &str) -> Result<CommandResult>>;

/// Completes `(word, line, begin, end)` for a command.
pub type CompleteHook = Rc<dyn Fn(&Shell, &str, &str, usize, usize) -> Vec<String>>;

/// Prints help for a command.
pub type HelpHook = Rc<dyn Fn(&mut Shell)>;

/// The three entry points bound for one top-level command.
#[derive(Clone)]
pub struct Hooks {
    pub execute: ExecuteHook,
    pub complete: CompleteHook,
    pub help: HelpHook,
}

impl Hooks {
    /// Hooks forwarding to a specific command instance.
    pub fn for_command(command: Rc<Command>) -> Self {
        let exec_cmd = Rc::clone(&command);
        let complete_cmd = Rc::clone(&command);
        let help_cmd = command;

        Self {
            execute: Rc::new(move |shell: &mut Shell, line: &str| {
                exec_cmd.execute(shell, &split_args(line))
            }),
            complete: Rc::new(
                move |shell: &Shell, word: &str, line: &str, begin: usize, end: usize| {
                    complete_cmd.complete(shell, word, line, begin, end)
                },
            ),
            help: Rc::new(move |shell: &mut Shell| help_cmd.describe(shell)),
        }
    }
}

/// Name → hooks registration table.
#[derive(Clone, Default)]
pub struct Bindings {
    table: BTreeMap<String, Hooks>,
}

impl Bindings {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a top-level command under its name, replacing any previous binding.
    ///
    /// Subcommands are reached through their top-level parent and are never
    /// bound; returns `false` for them.
    pub fn bind(&mut self, command: Rc<Command>) -> bool {
        if command.level() != 0 {
            return false;
        }
        let name = command.name().to_string();
        self.unbind(&name);
        self.table.insert(name, Hooks::for_command(command));
        true
    }

    /// Remove the binding for `name`, returning whether one existed.
    pub fn unbind(&mut self, name: &str) -> bool {
        self.table.remove(name).is_some()
    }

    /// Hooks bound under `name`.
    pub fn get(&self, name: &str) -> Option<Hooks> {
        self.table.get(name).cloned()
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.table.keys().map(String::as_str).collect()
    }

    /// Number of bound commands.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Split the raw argument text of a command line into words.
pub fn split_args(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}
