//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations
//! the release workflows need, allowing for a real implementation backed by
//! `git2` and a mock implementation for testing.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Branch switching, committing and pushing the release branch go through
//! the `git` CLI instead (see [cli::GitCli]), since `git pull --rebase` and
//! `git stash` have no libgit2 equivalent.
//!
//! ```rust
//! # use workspace_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let tags = repo.recent_tags(50)?;
//! let raw = repo.raw_commits_between("pika@0.0.1", "pika@0.0.2", None)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod mock;
pub mod repository;

pub use cli::GitCli;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::Path;

/// Common git operation trait for abstraction
///
/// Implementations map underlying errors (like `git2::Error`) into
/// [crate::error::ReleaseError]. No `Send + Sync` bound: `git2::Repository`
/// is not `Sync`.
pub trait Repository {
    /// Most recently created tags, newest first, at most `limit` of them
    ///
    /// Annotated tags are dated by their tagger, lightweight tags by the
    /// commit they point to.
    fn recent_tags(&self, limit: usize) -> Result<Vec<String>>;

    /// Raw commit log for the range `from..to`
    ///
    /// Returns commits reachable from `to` but not from `from`, newest
    /// first, each written as a four-line record (author email, date, hash,
    /// subject) followed by [crate::domain::RAW_COMMIT_SEPARATOR]. When `path`
    /// is given only commits touching it are listed.
    fn raw_commits_between(&self, from: &str, to: &str, path: Option<&Path>) -> Result<String>;

    /// URL configured for a remote, if the remote exists
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// Create a lightweight tag on the current HEAD commit
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Push a single tag to a remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;
}

/// Convert a remote URL into the browsable https URL of the repository.
///
/// ```rust
/// # use workspace_release::git::web_url_from_remote;
/// assert_eq!(
///     web_url_from_remote("git@github.com:acme/tools.git").as_deref(),
///     Some("https://github.com/acme/tools")
/// );
/// ```
pub fn web_url_from_remote(remote_url: &str) -> Option<String> {
    let url = remote_url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    let host_and_path = if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("ssh://"))
        .or_else(|| url.strip_prefix("git://"))
    {
        // drop credentials or ssh user
        let rest = rest.rsplit_once('@').map_or(rest, |(_, host)| host);
        let (host, path) = rest.split_once('/')?;
        // drop an explicit port
        let host = host.split(':').next().unwrap_or(host);
        format!("{}/{}", host, path)
    } else if let Some((user_host, path)) = url.split_once(':') {
        // scp-like syntax: git@host:owner/repo
        let host = user_host.rsplit_once('@').map_or(user_host, |(_, host)| host);
        format!("{}/{}", host, path.trim_start_matches('/'))
    } else {
        return None;
    };

    if host_and_path.ends_with('/') || !host_and_path.contains('/') {
        return None;
    }

    Some(format!("https://{}", host_and_path))
}
