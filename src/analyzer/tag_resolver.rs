use crate::domain::{is_prerelease_version, sort_versions_descending, ReleaseTag};
use crate::error::Result;
use crate::git::Repository;
use tracing::debug;

/// Find the tag a release should be compared against.
///
/// `candidates` are the package's versions (without the `name@` prefix).
/// They are sorted newest first and the scan starts right after
/// `releasing_version`, or at the top if it is not among them.
///
/// - a prerelease compares to the next older version of any kind
///   (`pika@0.0.1-dev.8` → `pika@0.0.1-dev.7`)
/// - a stable release compares to the next older stable version
///   (`pika@0.0.2` → `pika@0.0.1`)
///
/// Returns the full `name@version` tag, or `None` when nothing older exists.
pub fn find_previous_tag<S: AsRef<str>>(
    candidates: &[S],
    package_name: &str,
    releasing_version: &str,
) -> Option<String> {
    let sorted = sort_versions_descending(candidates);
    let releasing_idx = sorted.iter().position(|v| v == releasing_version);
    debug!(?sorted, ?releasing_idx, "sorted candidate versions");

    let start = releasing_idx.map_or(0, |idx| idx + 1);
    let older = sorted.get(start..).unwrap_or_default();

    let previous = if is_prerelease_version(releasing_version) {
        older.first()
    } else {
        older.iter().find(|v| !is_prerelease_version(v))
    };

    previous.map(|version| format!("{}@{}", package_name, version))
}

/// Resolves previous releases from the tags of a repository
pub struct TagResolver {
    scan_limit: usize,
}

impl TagResolver {
    /// Create a resolver looking at the `scan_limit` most recent tags
    pub fn new(scan_limit: usize) -> Self {
        TagResolver { scan_limit }
    }

    /// Versions of `package_name` found among `tags`
    pub fn candidates_for(tags: &[String], package_name: &str) -> Vec<String> {
        let prefix = format!("{}@", package_name);
        tags.iter()
            .filter_map(|tag| tag.strip_prefix(&prefix))
            .map(str::to_string)
            .collect()
    }

    /// Look up the tag `release` should be diffed against
    pub fn resolve<R: Repository>(&self, repo: &R, release: &ReleaseTag) -> Result<Option<String>> {
        let tags = repo.recent_tags(self.scan_limit)?;
        debug!(?tags, "recent tags");

        let candidates = Self::candidates_for(&tags, &release.package_name);
        debug!(?candidates, package = %release.package_name, "package versions");

        Ok(find_previous_tag(
            &candidates,
            &release.package_name,
            &release.version,
        ))
    }
}
