//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. Clones share the same capture buffer,
//! so a test can hand one clone to a [`Shell`](crate::shell::Shell) and keep
//! another to inspect what was printed.
//!
//! # Example
//!
//! ```
//! use dtshell::ui::{MockUI, UserInterface};
//!
//! let probe = MockUI::new();
//! let mut ui = probe.clone();
//!
//! ui.message("Updating commands...");
//! ui.success("OK");
//!
//! assert!(probe.has_message("Updating commands"));
//! assert!(probe.has_success("OK"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::{NoopSpinner, OutputMode, SpinnerHandle, UserInterface};

#[derive(Debug, Default)]
struct Captured {
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<String>,
}

/// Mock UI implementation for testing.
#[derive(Debug, Clone, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    captured: Rc<RefCell<Captured>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> Vec<String> {
        self.captured.borrow().messages.clone()
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> Vec<String> {
        self.captured.borrow().warnings.clone()
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> Vec<String> {
        self.captured.borrow().errors.clone()
    }

    /// Get all captured headers.
    pub fn headers(&self) -> Vec<String> {
        self.captured.borrow().headers.clone()
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> Vec<String> {
        self.captured.borrow().spinners.clone()
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.captured
            .borrow()
            .messages
            .iter()
            .any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.captured
            .borrow()
            .successes
            .iter()
            .any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.captured
            .borrow()
            .warnings
            .iter()
            .any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.captured.borrow().errors.iter().any(|m| m.contains(msg))
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        *self.captured.borrow_mut() = Captured::default();
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.captured.borrow_mut().messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.captured.borrow_mut().successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.captured.borrow_mut().warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.captured.borrow_mut().errors.push(msg.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.captured.borrow_mut().spinners.push(message.to_string());
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        self.captured.borrow_mut().headers.push(title.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
