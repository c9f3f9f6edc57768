use crate::domain::version::is_prerelease_version;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn release_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*)@([0-9].*)").expect("valid release tag regex"))
}

/// A published package release, written as `name@version` in git tags
/// (e.g. `pika@0.0.1-dev.8`, `@scope/ui@1.4.0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseTag {
    pub package_name: String,
    pub version: String,
}

impl ReleaseTag {
    /// Create a release tag without validation
    pub fn new(package_name: impl Into<String>, version: impl Into<String>) -> Self {
        ReleaseTag {
            package_name: package_name.into(),
            version: version.into(),
        }
    }

    /// Parse `name@version`.
    ///
    /// The name runs up to the last `@` followed by a digit, so scoped
    /// package names keep their leading `@`. The version must be valid semver.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Prefix shared by every tag of this package (`name@`)
    pub fn prefix(&self) -> String {
        format!("{}@", self.package_name)
    }

    pub fn is_prerelease(&self) -> bool {
        is_prerelease_version(&self.version)
    }
}

impl FromStr for ReleaseTag {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let captures = release_tag_regex()
            .captures(s)
            .ok_or_else(|| ReleaseError::tag(format!("'{}' is not of the form <name>@<version>", s)))?;

        let package_name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let version = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

        if package_name.is_empty() {
            return Err(ReleaseError::tag(format!("'{}' has an empty package name", s)));
        }

        semver::Version::parse(version).map_err(|e| {
            ReleaseError::version(format!("'{}' in tag '{}' is not semver: {}", version, s, e))
        })?;

        Ok(ReleaseTag::new(package_name, version))
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.package_name, self.version)
    }
}
