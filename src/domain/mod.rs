//! Domain logic - pure release rules independent of git and the registry

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::{parse_raw_commits, CommitCategory, ParsedCommit, RAW_COMMIT_SEPARATOR};
pub use tag::ReleaseTag;
pub use version::{is_prerelease_version, sort_versions_descending};
