//! Changelog generation: bucketing commits, rendering and persisting them.

pub mod file;
pub mod render;

pub use file::prepend_changelog;
pub use render::{ChangelogRender, ChangelogRenderer};

use crate::domain::{parse_raw_commits, CommitCategory, ParsedCommit};

/// Commits of one release range, grouped by category in log order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedCommits {
    pub features: Vec<ParsedCommit>,
    pub bug_fixes: Vec<ParsedCommit>,
    pub refactors: Vec<ParsedCommit>,
    pub performance: Vec<ParsedCommit>,
    pub misc: Vec<ParsedCommit>,
    pub internal: Vec<ParsedCommit>,
}

impl CategorizedCommits {
    /// File every commit under exactly one category
    pub fn from_commits(commits: impl IntoIterator<Item = ParsedCommit>) -> Self {
        let mut buckets = CategorizedCommits::default();
        for commit in commits {
            buckets.push(commit);
        }
        buckets
    }

    /// Parse a raw commit log and bucket the result
    pub fn from_raw_log(raw_log: &str) -> Self {
        Self::from_commits(parse_raw_commits(raw_log))
    }

    pub fn push(&mut self, commit: ParsedCommit) {
        let category = commit.category();
        self.bucket_mut(category).push(commit);
    }

    pub fn bucket(&self, category: CommitCategory) -> &[ParsedCommit] {
        match category {
            CommitCategory::Feature => &self.features,
            CommitCategory::BugFix => &self.bug_fixes,
            CommitCategory::Refactor => &self.refactors,
            CommitCategory::Performance => &self.performance,
            CommitCategory::Miscellaneous => &self.misc,
            CommitCategory::Internal => &self.internal,
        }
    }

    fn bucket_mut(&mut self, category: CommitCategory) -> &mut Vec<ParsedCommit> {
        match category {
            CommitCategory::Feature => &mut self.features,
            CommitCategory::BugFix => &mut self.bug_fixes,
            CommitCategory::Refactor => &mut self.refactors,
            CommitCategory::Performance => &mut self.performance,
            CommitCategory::Miscellaneous => &mut self.misc,
            CommitCategory::Internal => &mut self.internal,
        }
    }

    pub fn len(&self) -> usize {
        CommitCategory::DISPLAY_ORDER
            .iter()
            .map(|category| self.bucket(*category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
