//! Commands-repository remote settings.

use std::time::Duration;

use super::store::ShellConfig;

/// Default commands repository.
pub const DEFAULT_REMOTE_URL: &str = "https://github.com/duckietown/duckietown-shell-commands.git";

/// Default tracked branch.
pub const DEFAULT_BRANCH: &str = "master";

/// Hosting-service API endpoint template for the branch-tip probe.
const PROBE_URL_TEMPLATE: &str = "https://api.github.com/repos/{repo}/branches/{branch}";

/// How long a probed remote revision is trusted (10 minutes).
const STALENESS_WINDOW_SECS: u64 = 600;

/// Timeout for the branch-tip probe.
const PROBE_TIMEOUT_SECS: u64 = 1;

/// Where the commands repository lives and how it is probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    /// Git URL registered as `origin`.
    pub url: String,
    /// Branch tracked locally.
    pub branch: String,
    /// Read-only metadata endpoint returning the branch tip.
    pub probe_url: String,
    /// How long a probed remote revision is trusted.
    pub staleness_window: Duration,
    /// Timeout for the metadata probe.
    pub probe_timeout: Duration,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self::for_remote(DEFAULT_REMOTE_URL, DEFAULT_BRANCH)
    }
}

impl RemoteSettings {
    /// Settings for a remote URL and branch, deriving the probe URL when the
    /// remote is hosted on GitHub.
    pub fn for_remote(url: &str, branch: &str) -> Self {
        let probe_url = github_repo(url)
            .map(|repo| {
                PROBE_URL_TEMPLATE
                    .replace("{repo}", &repo)
                    .replace("{branch}", branch)
            })
            .unwrap_or_default();

        Self {
            url: url.to_string(),
            branch: branch.to_string(),
            probe_url,
            staleness_window: Duration::from_secs(STALENESS_WINDOW_SECS),
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
        }
    }

    /// Settings from the persisted config (`commands_remote`,
    /// `commands_branch`), falling back to the defaults.
    pub fn from_config(config: &ShellConfig) -> Self {
        let url = config.get("commands_remote").unwrap_or(DEFAULT_REMOTE_URL);
        let branch = config.get("commands_branch").unwrap_or(DEFAULT_BRANCH);
        Self::for_remote(url, branch)
    }
}

/// Extract `owner/name` from a GitHub git URL.
fn github_repo(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("git@github.com:"))?;
    let repo = rest.trim_end_matches('/').trim_end_matches(".git");
    if repo.split('/').filter(|s| !s.is_empty()).count() == 2 {
        Some(repo.to_string())
    } else {
        None
    }
}
