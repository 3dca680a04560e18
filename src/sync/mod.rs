//! Remote synchronization of the commands directory.
//!
//! The commands root is a git checkout of a remote repository. On first
//! start it is cloned; `update` pulls it; and on every start the checked-out
//! revision is compared against the remote branch tip, using a short-lived
//! cache so the network is hit at most once per staleness window.

pub mod cache;
pub mod git;
pub mod manager;
pub mod probe;

pub use cache::{UpdatesCache, UpdatesCheck};
pub use git::GitClient;
pub use manager::{OutdatedCheck, SyncManager, SyncStatus, REMOTE_NAME};
pub use probe::{GithubProbe, RemoteProbe};
