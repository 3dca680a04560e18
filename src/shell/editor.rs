//! Line editing for the interactive loop.
//!
//! The loop only needs "read one line with this prompt and these
//! completions"; [`TerminalEditor`] provides it on a terminal with history
//! and tab completion, [`PipedEditor`] reads lines from a non-terminal
//! stdin, and [`ScriptedEditor`] replays fixed input.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead};

use dialoguer::theme::Theme;
use dialoguer::{BasicHistory, Completion, Input};

use crate::error::{Result, ShellError};

/// Maximum number of lines kept in the session history.
const HISTORY_SIZE: usize = 200;

/// Supplies completion candidates for a partial line.
pub trait LineCompleter {
    /// Candidates for the last word of `line`.
    fn complete(&self, line: &str) -> Vec<String>;
}

/// Reads input lines.
pub trait LineEditor {
    /// Read one line. `None` means end of input.
    fn read_line(&mut self, prompt: &str, completer: &dyn LineCompleter) -> Result<Option<String>>;
}

/// Prints the prompt as-is, without decorations.
struct PromptTheme;

impl Theme for PromptTheme {
    fn format_input_prompt(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        _default: Option<&str>,
    ) -> fmt::Result {
        write!(f, "{}", prompt)
    }

    fn format_input_prompt_selection(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        sel: &str,
    ) -> fmt::Result {
        write!(f, "{}{}", prompt, sel)
    }
}

/// Adapts a [`LineCompleter`] to dialoguer's single-replacement completion.
struct TabCompletion<'a> {
    completer: &'a dyn LineCompleter,
}

impl Completion for TabCompletion<'_> {
    fn get(&self, input: &str) -> Option<String> {
        complete_input(input, &self.completer.complete(input))
    }
}

/// Replace the last word of `input` with the unique candidate, or extend it
/// to the candidates' common prefix.
fn complete_input(input: &str, candidates: &[String]) -> Option<String> {
    let word = input.rsplit(char::is_whitespace).next().unwrap_or("");
    let head = &input[..input.len() - word.len()];

    match candidates {
        [] => None,
        [only] => Some(format!("{}{} ", head, only)),
        [first, rest @ ..] => {
            let prefix = rest.iter().fold(first.as_str(), |prefix, c| {
                let shared = prefix
                    .char_indices()
                    .zip(c.chars())
                    .take_while(|((_, a), b)| a == b)
                    .last()
                    .map(|((i, a), _)| i + a.len_utf8())
                    .unwrap_or(0);
                &prefix[..shared]
            });
            (prefix.len() > word.len()).then(|| format!("{}{}", head, prefix))
        }
    }
}

/// Terminal line editor with history and tab completion.
pub struct TerminalEditor {
    history: BasicHistory,
}

impl TerminalEditor {
    pub fn new() -> Self {
        Self {
            history: BasicHistory::new()
                .max_entries(HISTORY_SIZE)
                .no_duplicates(true),
        }
    }
}

impl Default for TerminalEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor for TerminalEditor {
    fn read_line(&mut self, prompt: &str, completer: &dyn LineCompleter) -> Result<Option<String>> {
        let completion = TabCompletion { completer };
        let theme = PromptTheme;

        let result = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .completion_with(&completion)
            .history_with(&mut self.history)
            .interact_text();

        match result {
            Ok(line) => Ok(Some(line)),
            Err(e) => {
                let e: io::Error = e.into();
                match e.kind() {
                    io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof => Ok(None),
                    _ => Err(ShellError::Io(e)),
                }
            }
        }
    }
}

/// Editor reading plain lines from a non-terminal input, such as a pipe.
pub struct PipedEditor<R> {
    reader: R,
}

impl<R: BufRead> PipedEditor<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineEditor for PipedEditor<R> {
    fn read_line(&mut self, _prompt: &str, _completer: &dyn LineCompleter) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Editor replaying a fixed list of lines, then reporting end of input.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    lines: VecDeque<String>,
    prompts: usize,
}

impl ScriptedEditor {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: 0,
        }
    }

    /// How many times a line was requested.
    pub fn prompts(&self) -> usize {
        self.prompts
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, _prompt: &str, _completer: &dyn LineCompleter) -> Result<Option<String>> {
        self.prompts += 1;
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unique_candidate_replaces_word() {
        assert_eq!(
            complete_input("install al", &strings(&["alpha"])),
            Some("install alpha ".to_string())
        );
    }

    #[test]
    fn shared_prefix_extends_word() {
        assert_eq!(
            complete_input("bu", &strings(&["build", "build-all"])),
            Some("build".to_string())
        );
    }

    #[test]
    fn no_progress_means_no_completion() {
        assert_eq!(complete_input("e", &strings(&["echo", "exit"])), None);
        assert_eq!(complete_input("x", &[]), None);
    }

    struct NoCompletion;

    impl LineCompleter for NoCompletion {
        fn complete(&self, _line: &str) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn piped_editor_strips_newlines() {
        let mut editor = PipedEditor::new(io::Cursor::new("version\r\n\nexit"));

        assert_eq!(editor.read_line("", &NoCompletion).unwrap().as_deref(), Some("version"));
        assert_eq!(editor.read_line("", &NoCompletion).unwrap().as_deref(), Some(""));
        assert_eq!(editor.read_line("", &NoCompletion).unwrap().as_deref(), Some("exit"));
        assert_eq!(editor.read_line("", &NoCompletion).unwrap(), None);
    }

    #[test]
    fn scripted_editor_replays_then_ends() {
        let mut editor = ScriptedEditor::new(["version", "exit"]);

        assert_eq!(editor.read_line("dt> ", &NoCompletion).unwrap().as_deref(), Some("version"));
        assert_eq!(editor.read_line("dt> ", &NoCompletion).unwrap().as_deref(), Some("exit"));
        assert_eq!(editor.read_line("dt> ", &NoCompletion).unwrap(), None);
        assert_eq!(editor.prompts(), 3);
    }
}
