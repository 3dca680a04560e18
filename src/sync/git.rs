//! Git plumbing for the commands repository.
//!
//! Thin wrapper over the `git` binary. Each call runs one subprocess in the
//! repository directory and fails with git's stderr.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ShellError;

/// Runs git commands inside one working tree.
#[derive(Debug, Clone)]
pub struct GitClient {
    repo: PathBuf,
}

impl GitClient {
    /// Create a client for the working tree at `repo`.
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    /// The working tree directory.
    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// Whether the working tree already holds a git repository.
    pub fn is_repository(&self) -> bool {
        self.repo.join(".git").exists()
    }

    /// Create the directory and an empty repository in it.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.repo)
            .with_context(|| format!("Failed to create {}", self.repo.display()))?;
        self.run(&["init", "--quiet"])?;
        Ok(())
    }

    /// Register a remote.
    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url])?;
        Ok(())
    }

    /// URL registered for a remote.
    pub fn remote_url(&self, name: &str) -> Result<String> {
        self.run(&["remote", "get-url", name])
    }

    /// Whether the remote answers a ref listing.
    pub fn remote_reachable(&self, remote: &str) -> bool {
        match self.run(&["ls-remote", "--heads", remote]) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Remote {} unreachable: {}", remote, e);
                false
            }
        }
    }

    /// Fetch from a remote.
    pub fn fetch(&self, remote: &str) -> Result<()> {
        self.run(&["fetch", "--quiet", remote])?;
        Ok(())
    }

    /// Create (or reset) a local branch tracking `<remote>/<branch>` and check it out.
    pub fn create_tracking_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let upstream = format!("{}/{}", remote, branch);
        self.run(&["checkout", "--quiet", "-B", branch, "--track", &upstream])?;
        Ok(())
    }

    /// Fast-forward the current branch from a remote branch.
    pub fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["pull", "--quiet", "--ff-only", remote, branch])?;
        Ok(())
    }

    /// Check out a local branch.
    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "--quiet", branch])?;
        Ok(())
    }

    /// Bring submodules to their pinned revisions.
    pub fn submodule_update(&self) -> Result<()> {
        self.run(&["submodule", "update", "--init", "--recursive"])?;
        Ok(())
    }

    /// Revision checked out in the working tree.
    pub fn head_sha(&self) -> Result<String> {
        self.run(&["rev-parse", "HEAD"])
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .context("Failed to run git")?;

        if !output.status.success() {
            bail!(ShellError::GitFailed {
                command: args.first().copied().unwrap_or_default().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
