//! Error types for shell operations.
//!
//! This module defines [`ShellError`], the primary error type used throughout
//! the shell, [`ResolveError`] for command entry-point resolution, and a
//! [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `ShellError` for failures a caller or the user must act on
//! - Use `ResolveError` inside the loader, where failures are downgraded to
//!   placeholder commands and never surface as errors
//! - Use `anyhow::Error` (via `ShellError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for shell operations.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Failed to parse the persisted configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A configuration key was requested but never set.
    #[error("The configuration key '{key}' is not set. Run `config set {key} <value>` to set it.")]
    MissingConfigKey { key: String },

    /// The commands repository remote cannot be reached.
    #[error("The commands repository '{url}' cannot be found")]
    RemoteUnreachable { url: String },

    /// A git subprocess failed.
    #[error("git {command} failed: {message}")]
    GitFailed { command: String, message: String },

    /// No core or discovered command matches the name.
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// An external command entry point could not be spawned.
    #[error("Failed to run '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for ShellError {
    /// Recover a `ShellError` raised inside an anyhow chain (git plumbing
    /// bails with [`ShellError::GitFailed`]); wrap anything else.
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ShellError>() {
            Ok(inner) => inner,
            Err(other) => ShellError::Other(other),
        }
    }
}

/// Reasons a command package's entry point could not be turned into a
/// concrete command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The package has no `command.*` file.
    #[error("no entry point in {path}")]
    MissingEntryPoint { path: PathBuf },

    /// The entry point exists but cannot be run.
    #[error("entry point {path} is not executable")]
    NotExecutable { path: PathBuf },

    /// The package manifest cannot be read or parsed.
    #[error("invalid manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// A registered factory refused to build the command.
    #[error("factory for '{name}' failed: {message}")]
    FactoryFailed { name: String, message: String },
}

/// Result type alias for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;
