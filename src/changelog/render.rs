use chrono::NaiveDate;
use tracing::{debug, instrument};

use super::CategorizedCommits;
use crate::domain::{CommitCategory, ParsedCommit};

/// Rendered changelog section for one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogRender {
    pub plain_text: String,
    pub markdown: String,
}

/// Renders categorized commits as plain text and markdown
pub struct ChangelogRenderer {
    /// Browsable repository URL for compare and commit links
    repository_url: String,
    /// Commits by this author are left out of the Internal section
    bot_author: String,
}

impl ChangelogRenderer {
    pub fn new(repository_url: impl Into<String>, bot_author: impl Into<String>) -> Self {
        let repository_url = repository_url.into().trim_end_matches('/').to_string();
        ChangelogRenderer {
            repository_url,
            bot_author: bot_author.into(),
        }
    }

    fn compare_url(&self, from: &str, to: &str) -> String {
        format!("{}/compare/{}...{}", self.repository_url, from, to)
    }

    fn commit_url(&self, hash: &str) -> String {
        format!("{}/commit/{}", self.repository_url, hash)
    }

    /// Non-empty sections in display order
    fn sections<'c>(
        &self,
        commits: &'c CategorizedCommits,
    ) -> Vec<(CommitCategory, Vec<&'c ParsedCommit>)> {
        CommitCategory::DISPLAY_ORDER
            .iter()
            .map(|&category| {
                let shown: Vec<&ParsedCommit> = commits
                    .bucket(category)
                    .iter()
                    .filter(|c| category != CommitCategory::Internal || c.author != self.bot_author)
                    .collect();
                (category, shown)
            })
            .filter(|(_, shown)| !shown.is_empty())
            .collect()
    }

    /// Render the changelog section for `from...to` dated `date`
    #[instrument(skip(self, commits), fields(commit_count = commits.len()))]
    pub fn render(
        &self,
        commits: &CategorizedCommits,
        from: &str,
        to: &str,
        date: NaiveDate,
    ) -> ChangelogRender {
        let date = date.format("%Y-%m-%d");
        let sections = self.sections(commits);

        let mut plain_body = Vec::new();
        let mut markdown_body = Vec::new();
        for (category, shown) in &sections {
            plain_body.push(format!("\n{}", category.title()));
            markdown_body.push(format!("\n### {}", category.title()));

            for commit in shown {
                plain_body.push(commit.subject.clone());
                markdown_body.push(format!(
                    "* {} ([{}]({})) by {}",
                    commit.subject,
                    commit.short_hash(),
                    self.commit_url(&commit.hash),
                    commit.author
                ));
            }
        }

        let plain_text = format!("{} ({})\n{}", to, date, plain_body.join("\n"));
        let markdown = format!(
            "# [{}]({}) ({})\n{}",
            to,
            self.compare_url(from, to),
            date,
            markdown_body.join("\n")
        );

        debug!(
            sections = sections.len(),
            markdown_len = markdown.len(),
            "changelog rendered"
        );
        ChangelogRender {
            plain_text,
            markdown,
        }
    }
}
