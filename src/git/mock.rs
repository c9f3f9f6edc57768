use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A `raw_commits_between` call seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct CommitQuery {
    pub from: String,
    pub to: String,
    pub path: Option<PathBuf>,
}

/// Mock repository for testing without actual git operations
///
/// Tags are returned in the order given, which stands in for creation
/// order (newest first). Writes are recorded for later inspection.
#[derive(Default)]
pub struct MockRepository {
    tags: Vec<String>,
    raw_log: String,
    remote_url: Option<String>,
    fail_push: bool,
    commit_queries: RefCell<Vec<CommitQuery>>,
    created_tags: RefCell<Vec<String>>,
    pushed_tags: RefCell<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags, newest first
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Raw log returned for any commit range
    pub fn with_raw_log(mut self, raw_log: impl Into<String>) -> Self {
        self.raw_log = raw_log.into();
        self
    }

    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// Make every `push_tag` call fail
    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn commit_queries(&self) -> Vec<CommitQuery> {
        self.commit_queries.borrow().clone()
    }

    pub fn created_tags(&self) -> Vec<String> {
        self.created_tags.borrow().clone()
    }

    /// Pushed tags as `(remote, tag)` pairs
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.pushed_tags.borrow().clone()
    }
}

impl Repository for MockRepository {
    fn recent_tags(&self, limit: usize) -> Result<Vec<String>> {
        Ok(self.tags.iter().take(limit).cloned().collect())
    }

    fn raw_commits_between(&self, from: &str, to: &str, path: Option<&Path>) -> Result<String> {
        self.commit_queries.borrow_mut().push(CommitQuery {
            from: from.to_string(),
            to: to.to_string(),
            path: path.map(Path::to_path_buf),
        });
        Ok(self.raw_log.clone())
    }

    fn remote_url(&self, _remote: &str) -> Result<Option<String>> {
        Ok(self.remote_url.clone())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let mut created = self.created_tags.borrow_mut();
        if created.iter().any(|t| t == name) || self.tags.iter().any(|t| t == name) {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }
        created.push(name.to_string());
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        if self.fail_push {
            return Err(ReleaseError::tag(format!("Failed to push tag '{}'", name)));
        }
        self.pushed_tags
            .borrow_mut()
            .push((remote.to_string(), name.to_string()));
        Ok(())
    }
}
