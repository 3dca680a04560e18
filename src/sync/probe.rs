//! Remote branch-tip probe.
//!
//! Asks the hosting service for the latest revision of the tracked branch
//! without touching the local repository.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::RemoteSettings;

/// Source of the remote branch tip.
pub trait RemoteProbe {
    /// Latest revision of the tracked branch.
    fn latest_revision(&self) -> Result<String>;
}

/// Probe backed by the GitHub branches API.
#[derive(Debug, Clone)]
pub struct GithubProbe {
    url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct BranchInfo {
    commit: BranchCommit,
}

#[derive(Debug, Deserialize)]
struct BranchCommit {
    sha: String,
}

impl GithubProbe {
    /// Probe a branches endpoint with a request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    /// Probe configured from remote settings.
    pub fn from_settings(settings: &RemoteSettings) -> Self {
        Self::new(&settings.probe_url, settings.probe_timeout)
    }

    /// The endpoint queried.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RemoteProbe for GithubProbe {
    fn latest_revision(&self) -> Result<String> {
        if self.url.is_empty() {
            bail!("No probe endpoint for this remote");
        }

        let client = Client::builder()
            .user_agent("dtshell")
            .timeout(self.timeout)
            .build()?;

        let response = client.get(&self.url).send()?;
        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), self.url);
        }

        let info: BranchInfo = response
            .json()
            .context("Failed to parse branch response")?;
        Ok(info.commit.sha)
    }
}
