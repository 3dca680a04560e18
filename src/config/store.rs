//! The persisted JSON configuration object.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ShellError};

/// Key holding the user's authentication token.
pub const TOKEN_KEY: &str = "token_dt1";

/// JSON object persisted at `<root>/config`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    path: PathBuf,
    values: Map<String, Value>,
}

impl ShellConfig {
    /// An empty configuration that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: Map::new(),
        }
    }

    /// Load the configuration from `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| ShellError::ConfigParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;

        match value {
            Value::Object(values) => Ok(Self { path, values }),
            other => Err(ShellError::ConfigParseError {
                path,
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Load the configuration, writing an empty one first if the file is missing.
    pub fn load_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let config = Self::empty(&path);
            config.save()?;
            return Ok(config);
        }
        Self::load(path)
    }

    /// Write the configuration back to its file.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// The file this configuration is persisted to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a string value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Get a string value, failing with an actionable error when unset.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| ShellError::MissingConfigKey {
            key: key.to_string(),
        })
    }

    /// Set a string value (in memory; call [`save`](Self::save) to persist).
    pub fn set(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Remove a value, returning whether it was present.
    pub fn unset(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// All keys, in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// The authentication token.
    pub fn token(&self) -> Result<&str> {
        self.require(TOKEN_KEY)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
