//! User interface module.
//!
//! The release workflows run unattended in CI, so there are no prompts;
//! this module only formats what the operator reads in the job log.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_changed_paths, display_changelog_preview,
    display_command_output, display_error, display_published_tags, display_status,
    display_success,
};
