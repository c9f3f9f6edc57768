//! Semantic version ordering and prerelease detection for release tags.

use regex::Regex;
use semver::Version;
use std::sync::OnceLock;
use tracing::debug;

fn prerelease_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+-[a-zA-Z]+").expect("valid prerelease regex"))
}

/// Returns true when the version carries an alphabetic prerelease
/// identifier, e.g. `0.0.1-dev.8` or `1.2.0-beta`.
///
/// Purely numeric prerelease identifiers (`1.0.0-0`) do not count.
pub fn is_prerelease_version(version: &str) -> bool {
    prerelease_regex().is_match(version)
}

/// Sorts version strings from newest to oldest by semver precedence.
///
/// Strings that are not valid semantic versions are dropped. The input
/// strings are returned untouched so callers can match them exactly.
pub fn sort_versions_descending<S: AsRef<str>>(versions: &[S]) -> Vec<String> {
    let mut parsed: Vec<(Version, String)> = versions
        .iter()
        .filter_map(|v| {
            let v = v.as_ref();
            match Version::parse(v) {
                Ok(parsed) => Some((parsed, v.to_string())),
                Err(e) => {
                    debug!(version = v, error = %e, "skipping non-semver tag");
                    None
                }
            }
        })
        .collect();

    parsed.sort_by(|a, b| b.0.cmp(&a.0));
    parsed.into_iter().map(|(_, raw)| raw).collect()
}
