//! Keeps the commands directory in step with its remote repository.

use std::fs;

use crate::config::{RemoteSettings, ShellPaths};
use crate::error::{Result, ShellError};
use crate::ui::UserInterface;

use super::cache::UpdatesCache;
use super::git::GitClient;
use super::probe::{GithubProbe, RemoteProbe};

/// Name of the tracked remote.
pub const REMOTE_NAME: &str = "origin";

/// Where the commands checkout stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No repository has been created yet.
    Uninitialized,
    /// A local branch tracks the remote.
    Tracking,
    /// The last sync operation failed.
    Error,
}

/// Outcome of comparing the local revision against the remote tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutdatedCheck {
    /// Local and remote revisions match.
    UpToDate,
    /// The remote has moved on.
    Outdated { local: String, remote: String },
    /// No comparison was possible this cycle.
    Skipped,
}

/// Manages the git checkout under the commands root.
pub struct SyncManager {
    settings: RemoteSettings,
    git: GitClient,
    cache: UpdatesCache,
    probe: Box<dyn RemoteProbe>,
    status: SyncStatus,
}

impl SyncManager {
    /// Manager for the commands root in `paths`, probing the remote over HTTP.
    pub fn new(paths: &ShellPaths, settings: RemoteSettings) -> Self {
        let git = GitClient::new(paths.commands());
        let status = if git.is_repository() {
            SyncStatus::Tracking
        } else {
            SyncStatus::Uninitialized
        };

        Self {
            probe: Box::new(GithubProbe::from_settings(&settings)),
            cache: UpdatesCache::new(paths.updates_check_file()),
            settings,
            git,
            status,
        }
    }

    /// Replace the branch-tip probe.
    pub fn with_probe(mut self, probe: Box<dyn RemoteProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Current sync state.
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Remote settings in use.
    pub fn settings(&self) -> &RemoteSettings {
        &self.settings
    }

    /// The remote revision cache.
    pub fn cache(&self) -> &UpdatesCache {
        &self.cache
    }

    /// Clone the commands repository if the directory has none yet.
    ///
    /// Returns whether a first-time initialization happened.
    pub fn ensure_initialized(&mut self, ui: &mut dyn UserInterface) -> Result<bool> {
        if self.git.is_repository() {
            self.status = SyncStatus::Tracking;
            return Ok(false);
        }

        tracing::debug!(
            "Initializing {} from {}",
            self.git.repo().display(),
            self.settings.url
        );
        let mut spinner = ui.start_spinner("Downloading commands...");

        match self.initialize() {
            Ok(()) => {
                spinner.finish_success("Commands downloaded");
                self.status = SyncStatus::Tracking;
                Ok(true)
            }
            Err(e) => {
                spinner.finish_error("Failed to download commands");
                self.status = SyncStatus::Error;
                // a half-initialized repository would hide the failure on the next start
                if let Err(rm) = fs::remove_dir_all(self.git.repo().join(".git")) {
                    tracing::debug!("Failed to clean up repository: {}", rm);
                }
                if let ShellError::RemoteUnreachable { url } = &e {
                    ui.error(&format!("The commands repository {} cannot be found.", url));
                }
                Err(e)
            }
        }
    }

    fn initialize(&self) -> Result<()> {
        self.git.init()?;
        self.git.add_remote(REMOTE_NAME, &self.settings.url)?;
        if !self.git.remote_reachable(REMOTE_NAME) {
            return Err(ShellError::RemoteUnreachable {
                url: self.settings.url.clone(),
            });
        }
        self.git.fetch(REMOTE_NAME)?;
        self.git
            .create_tracking_branch(REMOTE_NAME, &self.settings.branch)?;
        self.git.pull(REMOTE_NAME, &self.settings.branch)?;
        Ok(())
    }

    /// Pull the latest commands and record the new local revision.
    pub fn update(&mut self, ui: &mut dyn UserInterface) -> Result<()> {
        self.ensure_initialized(ui)?;

        let url = self.git.remote_url(REMOTE_NAME)?;
        if !self.git.remote_reachable(REMOTE_NAME) {
            self.status = SyncStatus::Error;
            ui.error(&format!("The commands repository {} cannot be found.", url));
            return Err(ShellError::RemoteUnreachable { url });
        }

        let mut spinner = ui.start_spinner("Updating commands...");
        match self.pull_tracked() {
            Ok(local) => {
                spinner.finish_success("Commands updated");
                self.status = SyncStatus::Tracking;
                if let Err(e) = self.cache.write(&local) {
                    tracing::warn!("Failed to record revision: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                spinner.finish_error("Failed to update commands");
                self.status = SyncStatus::Error;
                Err(e.into())
            }
        }
    }

    fn pull_tracked(&self) -> anyhow::Result<String> {
        let branch = &self.settings.branch;
        self.git.pull(REMOTE_NAME, branch)?;
        self.git.checkout(branch)?;
        self.git.submodule_update()?;
        self.git.head_sha()
    }

    /// Compare the checked-out revision with the remote tip and tell the user
    /// when an update is available.
    pub fn check_outdated(&self, ui: &mut dyn UserInterface) -> OutdatedCheck {
        match self.git.head_sha() {
            Ok(local) => self.check_against(&local, ui),
            Err(e) => {
                tracing::debug!("Cannot read local revision: {}", e);
                OutdatedCheck::Skipped
            }
        }
    }

    /// Compare `local` with the remote tip, using the cache while it is
    /// fresh and probing otherwise.
    pub fn check_against(&self, local: &str, ui: &mut dyn UserInterface) -> OutdatedCheck {
        let remote = match self.cache.read_fresh(self.settings.staleness_window) {
            Some(remote) => remote,
            None => match self.probe.latest_revision() {
                Ok(remote) => {
                    if let Err(e) = self.cache.write(&remote) {
                        tracing::debug!("Failed to cache remote revision: {}", e);
                    }
                    remote
                }
                Err(e) => {
                    tracing::debug!("Skipping update check: {}", e);
                    return OutdatedCheck::Skipped;
                }
            },
        };

        if remote == local {
            return OutdatedCheck::UpToDate;
        }

        ui.warning("There are updates available for the commands. Run `update` to install them.");
        OutdatedCheck::Outdated {
            local: local.to_string(),
            remote,
        }
    }
}
