//! Cached remote revision for the outdated check.
//!
//! The cache file holds `{"remote": "<sha>"}`. Its modification time is the
//! time of the last live probe, so the stored revision is only trusted while
//! that time is within the staleness window.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Contents of the cache file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatesCheck {
    /// Last known tip of the tracked remote branch.
    pub remote: String,
}

/// The on-disk remote revision cache.
#[derive(Debug, Clone)]
pub struct UpdatesCache {
    path: PathBuf,
}

impl UpdatesCache {
    /// Cache stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the cache file. Missing or malformed files read as `None`.
    pub fn read(&self) -> Option<UpdatesCheck> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(check) => Some(check),
            Err(e) => {
                tracing::debug!("Ignoring malformed {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// When the cache was last written.
    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        let modified = fs::metadata(&self.path).ok()?.modified().ok()?;
        Some(modified.into())
    }

    /// The cached remote revision, if written less than `window` ago.
    pub fn read_fresh(&self, window: Duration) -> Option<String> {
        let checked = self.last_checked()?;
        let window = chrono::Duration::from_std(window).ok()?;
        let age = Utc::now().signed_duration_since(checked);
        if age >= window {
            tracing::debug!("Cached remote revision is {}s old", age.num_seconds());
            return None;
        }
        self.read().map(|check| check.remote)
    }

    /// Record a remote revision, resetting the freshness clock.
    pub fn write(&self, remote: &str) -> Result<()> {
        let check = UpdatesCheck {
            remote: remote.to_string(),
        };
        let content = serde_json::to_string(&check)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
pub(crate) fn backdate(path: &Path, by: Duration) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(std::time::SystemTime::now() - by).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WINDOW: Duration = Duration::from_secs(600);

    fn cache(temp: &TempDir) -> UpdatesCache {
        UpdatesCache::new(temp.path().join(".updates-check"))
    }

    #[test]
    fn missing_file_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);

        assert!(cache.read().is_none());
        assert!(cache.last_checked().is_none());
        assert!(cache.read_fresh(WINDOW).is_none());
    }

    #[test]
    fn write_then_read_fresh() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);

        cache.write("abc123").unwrap();

        assert_eq!(cache.read_fresh(WINDOW).as_deref(), Some("abc123"));
        let raw = fs::read_to_string(cache.path()).unwrap();
        assert_eq!(raw, r#"{"remote":"abc123"}"#);
    }

    #[test]
    fn stale_cache_is_ignored() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);
        cache.write("abc123").unwrap();

        backdate(cache.path(), Duration::from_secs(11 * 60));

        assert!(cache.read_fresh(WINDOW).is_none());
        // the value itself is still readable
        assert_eq!(cache.read().unwrap().remote, "abc123");
    }

    #[test]
    fn recent_cache_within_window_is_trusted() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);
        cache.write("abc123").unwrap();

        backdate(cache.path(), Duration::from_secs(5 * 60));

        assert_eq!(cache.read_fresh(WINDOW).as_deref(), Some("abc123"));
    }

    #[test]
    fn malformed_cache_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);
        fs::write(cache.path(), "not json").unwrap();

        assert!(cache.read().is_none());
        assert!(cache.read_fresh(WINDOW).is_none());
    }

    #[test]
    fn cache_without_remote_key_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);
        fs::write(cache.path(), r#"{"local":"abc"}"#).unwrap();

        assert!(cache.read_fresh(WINDOW).is_none());
    }
}
