use std::fmt;

/// Non-fatal conditions met while releasing.
/// They are reported to the user and the run ends normally.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No older tag exists for the package being released
    NoPreviousTag { tag: String },
    /// The tag range holds no commits touching the package
    NoCommitsInRange { from: String, to: String },
    /// The publish run reported no published packages
    NoPackagesPublished,
    /// A `+ ...` publish line did not hold `name@version`
    UnparsablePublishLine { line: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoPreviousTag { tag } => {
                write!(f, "No previous tag found for '{}', skipping changelog", tag)
            }
            BoundaryWarning::NoCommitsInRange { from, to } => {
                write!(f, "No commits between '{}' and '{}'", from, to)
            }
            BoundaryWarning::NoPackagesPublished => {
                write!(f, "No packages were published, nothing to tag")
            }
            BoundaryWarning::UnparsablePublishLine { line } => {
                write!(f, "Cannot read a package version from publish output '{}'", line)
            }
        }
    }
}
