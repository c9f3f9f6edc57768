use crate::error::Result;
use crate::process::CommandRunner;
use std::path::Path;
use tracing::debug;

/// `git` porcelain commands the release workflows run through the CLI
pub struct GitCli<'a, C: CommandRunner> {
    runner: &'a C,
}

impl<'a, C: CommandRunner> GitCli<'a, C> {
    pub fn new(runner: &'a C) -> Self {
        GitCli { runner }
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        Ok(self.runner.run_checked("git", args, None)?.stdout)
    }

    /// Make full history and every tag available locally.
    ///
    /// `--unshallow` fails on complete clones, so its failure is ignored.
    pub fn fetch_history(&self) -> Result<()> {
        let unshallow = self.runner.run("git", &["fetch", "--unshallow"], None)?;
        if !unshallow.success() {
            debug!(output = %unshallow.combined(), "git fetch --unshallow failed, continuing");
        }

        self.git(&["fetch", "--all", "--tags"])?;
        Ok(())
    }

    /// Name of the checked out branch (`HEAD` when detached)
    pub fn current_branch(&self) -> Result<String> {
        Ok(self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?.trim().to_string())
    }

    /// Check out `branch`, stashing local changes (untracked files included)
    /// first when another branch is checked out.
    ///
    /// # Returns
    /// * `Ok(true)` - A switch happened
    /// * `Ok(false)` - Already on `branch`
    pub fn ensure_on_branch(&self, branch: &str) -> Result<bool> {
        let current = self.current_branch()?;
        if current == branch {
            return Ok(false);
        }

        debug!(from = %current, to = branch, "switching branch");
        self.git(&["stash", "--include-untracked"])?;
        self.git(&["checkout", branch])?;
        Ok(true)
    }

    /// Stage `path`, commit it, rebase onto the remote branch and push.
    pub fn commit_and_push(&self, path: &Path, message: &str, remote: &str, branch: &str) -> Result<()> {
        let path = path.to_string_lossy();
        self.git(&["add", path.as_ref()])?;
        self.git(&["commit", "-m", message])?;
        self.git(&["pull", remote, branch, "--rebase"])?;
        self.git(&["push", remote, branch])?;
        Ok(())
    }
}
