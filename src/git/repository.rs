use crate::domain::commit::format_raw_record;
use crate::error::{ReleaseError, Result};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{DiffOptions, ErrorCode, Oid, Repository as Git2Repo, Sort, Tree};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Resolve a tag name (or any revision) to the commit it points at
    fn commit_oid(&self, name: &str) -> Result<Oid> {
        if let Ok(reference) = self.repo.find_reference(&format!("refs/tags/{}", name)) {
            return Ok(reference.peel_to_commit()?.id());
        }

        self.repo
            .revparse_single(name)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|e| ReleaseError::tag(format!("Cannot resolve '{}': {}", name, e)))
    }

    /// Creation time of a tag: tagger time for annotated tags, commit time
    /// for lightweight ones
    fn tag_creation_time(&self, name: &str) -> Result<i64> {
        let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

        if let Some(target) = reference.target() {
            if let Ok(tag) = self.repo.find_tag(target) {
                if let Some(tagger) = tag.tagger() {
                    return Ok(tagger.when().seconds());
                }
            }
        }

        Ok(reference.peel_to_commit()?.time().seconds())
    }

    /// Express `path` relative to the working directory, as pathspecs expect.
    ///
    /// Symlinks are resolved on both sides when a plain prefix match fails.
    fn pathspec_for(&self, path: &Path) -> PathBuf {
        let Some(workdir) = self.repo.workdir() else {
            return path.to_path_buf();
        };

        if let Ok(relative) = path.strip_prefix(workdir) {
            return relative.to_path_buf();
        }

        if let (Ok(workdir), Ok(resolved)) = (fs::canonicalize(workdir), fs::canonicalize(path)) {
            if let Ok(relative) = resolved.strip_prefix(&workdir) {
                return relative.to_path_buf();
            }
        }

        if path.is_absolute() {
            warn!(
                path = %path.display(),
                workdir = %workdir.display(),
                "path is outside the repository, no commit will match it"
            );
        }
        path.to_path_buf()
    }

    /// Whether the tree of `from` and `to` differ under `pathspec`
    fn differs_at(&self, from: Option<&Tree<'_>>, to: &Tree<'_>, pathspec: &Path) -> Result<bool> {
        let mut options = DiffOptions::new();
        options.pathspec(pathspec);
        let diff = self
            .repo
            .diff_tree_to_tree(from, Some(to), Some(&mut options))?;

        Ok(diff.deltas().next().is_some())
    }

    /// Whether `commit` changes `pathspec`, following `git log -- <path>`:
    /// a commit identical to any of its parents there is pruned, so merges
    /// that only bring in a branch's changes are left out.
    fn touches_path(&self, commit: &git2::Commit<'_>, pathspec: &Path) -> Result<bool> {
        let tree = commit.tree()?;
        if commit.parent_count() == 0 {
            return self.differs_at(None, &tree, pathspec);
        }

        for parent in commit.parents() {
            if !self.differs_at(Some(&parent.tree()?), &tree, pathspec)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Format a commit time the way `git log` prints `%ad` by default
fn format_git_date(time: git2::Time) -> String {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .unwrap_or_else(|| Utc.fix());

    match DateTime::from_timestamp(time.seconds(), 0) {
        Some(utc) => utc
            .with_timezone(&offset)
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string(),
        None => time.seconds().to_string(),
    }
}

impl super::Repository for Git2Repository {
    fn recent_tags(&self, limit: usize) -> Result<Vec<String>> {
        let names = self.repo.tag_names(None)?;

        let mut dated = Vec::new();
        for name in names.iter().flatten() {
            match self.tag_creation_time(name) {
                Ok(created) => dated.push((created, name.to_string())),
                Err(e) => debug!(tag = name, error = %e, "skipping unreadable tag"),
            }
        }

        dated.sort_by(|a, b| b.0.cmp(&a.0));
        dated.truncate(limit);

        Ok(dated.into_iter().map(|(_, name)| name).collect())
    }

    fn raw_commits_between(&self, from: &str, to: &str, path: Option<&Path>) -> Result<String> {
        let from_oid = self.commit_oid(from)?;
        let to_oid = self.commit_oid(to)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(to_oid)?;
        revwalk.hide(from_oid)?;

        let pathspec = path
            .map(|p| self.pathspec_for(p))
            .filter(|p| !p.as_os_str().is_empty());
        debug!(from, to, ?pathspec, "collecting commits");

        let mut raw = String::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;

            if let Some(pathspec) = &pathspec {
                if !self.touches_path(&commit, pathspec)? {
                    continue;
                }
            }

            let author = commit.author();
            raw.push_str(&format_raw_record(
                author.email().unwrap_or_default(),
                &format_git_date(author.when()),
                &commit.id().to_string(),
                commit.summary().unwrap_or_default(),
            ));
        }

        Ok(raw)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(found) => Ok(found.url().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|_| ReleaseError::config(format!("No remote named '{}' found", remote)))?;

        let git_config = self.repo.config()?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let username = username_from_url.unwrap_or("git");
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let key_path = Path::new(&home).join(".ssh").join(key);
                    if key_path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &key_path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                if let Ok(cred) = git2::Cred::credential_helper(&git_config, url, username_from_url)
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote_handle
            .push(&[format!("refs/tags/{}", name)], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    ReleaseError::tag(format!("Network error pushing tag '{}': {}", name, e))
                } else {
                    ReleaseError::tag(format!("Failed to push tag '{}': {}", name, e))
                }
            })
    }
}
