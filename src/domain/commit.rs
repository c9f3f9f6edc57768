use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Sentinel line terminating each record of a raw commit log.
pub const RAW_COMMIT_SEPARATOR: &str = ">>>SEPARATOR<<<";

/// One commit read from a raw commit log
///
/// Fields missing from a malformed record are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommit {
    pub author: String,
    pub date: String,
    pub hash: String,
    pub subject: String,
}

impl ParsedCommit {
    /// Build a commit, stripping the pull-request reference from the subject
    pub fn new(
        author: impl Into<String>,
        date: impl Into<String>,
        hash: impl Into<String>,
        subject: &str,
    ) -> Self {
        ParsedCommit {
            author: author.into(),
            date: date.into(),
            hash: hash.into(),
            subject: strip_pull_request_ref(subject),
        }
    }

    /// First eight characters of the hash
    pub fn short_hash(&self) -> &str {
        match self.hash.char_indices().nth(8) {
            Some((idx, _)) => &self.hash[..idx],
            None => &self.hash,
        }
    }

    pub fn category(&self) -> CommitCategory {
        CommitCategory::classify(&self.subject)
    }
}

fn pull_request_ref_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(#\d+\)").expect("valid pull request regex"))
}

/// Removes the first `(#123)` reference and any whitespace it leaves behind
fn strip_pull_request_ref(subject: &str) -> String {
    pull_request_ref_regex()
        .replacen(subject, 1, "")
        .trim_end()
        .to_string()
}

/// Format one commit as a raw log record terminated by the separator.
pub fn format_raw_record(author: &str, date: &str, hash: &str, subject: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}\n",
        author, date, hash, subject, RAW_COMMIT_SEPARATOR
    )
}

/// Parse a raw, separator-delimited commit log.
///
/// Each record's non-empty trimmed lines map, in order, to author, date,
/// hash and subject. Blank records are skipped. Short records yield commits
/// with empty trailing fields rather than an error.
pub fn parse_raw_commits(content: &str) -> Vec<ParsedCommit> {
    content
        .split(RAW_COMMIT_SEPARATOR)
        .filter(|record| !record.trim().is_empty())
        .map(|record| {
            let mut fields = record.lines().map(str::trim).filter(|line| !line.is_empty());
            let author = fields.next().unwrap_or_default();
            let date = fields.next().unwrap_or_default();
            let hash = fields.next().unwrap_or_default();
            let subject = fields.next().unwrap_or_default();
            ParsedCommit::new(author, date, hash, subject)
        })
        .collect()
}

/// Changelog bucket a commit is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitCategory {
    Feature,
    BugFix,
    Refactor,
    Performance,
    Miscellaneous,
    Internal,
}

impl CommitCategory {
    /// Order in which sections appear in a rendered changelog
    pub const DISPLAY_ORDER: [CommitCategory; 6] = [
        CommitCategory::BugFix,
        CommitCategory::Feature,
        CommitCategory::Refactor,
        CommitCategory::Performance,
        CommitCategory::Miscellaneous,
        CommitCategory::Internal,
    ];

    /// Section heading
    pub fn title(&self) -> &'static str {
        match self {
            CommitCategory::Feature => "Features",
            CommitCategory::BugFix => "Bug Fixes",
            CommitCategory::Refactor => "Refactor",
            CommitCategory::Performance => "Performance Improvements",
            CommitCategory::Miscellaneous => "Misc",
            CommitCategory::Internal => "Internal",
        }
    }

    /// Categorize a subject line. The first matching rule wins; subjects
    /// matching nothing are Internal.
    pub fn classify(subject: &str) -> Self {
        for (pattern, category) in classification_rules() {
            if pattern.is_match(subject) {
                return *category;
            }
        }
        CommitCategory::Internal
    }
}

impl fmt::Display for CommitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

fn classification_rules() -> &'static [(Regex, CommitCategory)] {
    static RULES: OnceLock<Vec<(Regex, CommitCategory)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"(?i)^feat(?:ure)?", CommitCategory::Feature),
            (r"(?i)^(?:bugfix|fix)", CommitCategory::BugFix),
            (r"^refact(?:or)?", CommitCategory::Refactor),
            (r"^perf", CommitCategory::Performance),
            // GitHub revert commits start with "Revert"
            (r"(?i)^revert", CommitCategory::Miscellaneous),
            (r"^(?:build|ci|chore|docs|test|style)", CommitCategory::Internal),
        ]
        .into_iter()
        .map(|(pattern, category)| {
            (
                Regex::new(pattern).expect("valid classification regex"),
                category,
            )
        })
        .collect()
    })
}
