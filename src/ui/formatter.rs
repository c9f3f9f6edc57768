//! Formatting functions for terminal output.
//!
//! Everything the operator sees goes through here; diagnostics go to
//! `tracing` instead.

use console::style;
use std::path::PathBuf;

use crate::boundary::BoundaryWarning;
use crate::changelog::ChangelogRender;
use crate::domain::ReleaseTag;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Show both renders of a changelog section.
///
/// Used by `changelog --dry-run`, where nothing is written.
pub fn display_changelog_preview(render: &ChangelogRender) {
    println!("\n{}", style("Changelog (plain text):").bold().underlined());
    println!("{}", render.plain_text);
    println!("\n{}", style("Changelog (markdown):").bold().underlined());
    println!("{}", render.markdown);
}

/// Echo a tool's captured output verbatim, dimmed
pub fn display_command_output(output: &str) {
    for line in output.lines() {
        println!("  {}", style(line).dim());
    }
}

/// Summary line for the packages a publish run re-tagged
pub fn format_published_tags(tags: &[ReleaseTag]) -> String {
    let names: Vec<String> = tags.iter().map(ToString::to_string).collect();
    format!("Tagged {} package(s): {}", tags.len(), names.join(", "))
}

pub fn display_published_tags(tags: &[ReleaseTag]) {
    display_success(&format_published_tags(tags));
}

/// Summary line for a debounced batch of file changes.
///
/// Lists at most five paths.
pub fn format_changed_paths(paths: &[PathBuf]) -> String {
    let mut shown: Vec<String> = paths
        .iter()
        .take(5)
        .map(|p| p.display().to_string())
        .collect();
    if paths.len() > 5 {
        shown.push(format!("... and {} more", paths.len() - 5));
    }
    format!("Changed: {}", shown.join(", "))
}

pub fn display_changed_paths(paths: &[PathBuf]) {
    display_status(&format_changed_paths(paths));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        // Visual verification test - output is printed to stdout
        display_success("test success");
    }

    #[test]
    fn test_display_status() {
        // Visual verification test - output is printed to stdout
        display_status("test status");
    }

    #[test]
    fn test_format_published_tags() {
        let tags = vec![
            ReleaseTag::new("pika", "0.0.2"),
            ReleaseTag::new("@scope/ui", "1.0.0"),
        ];
        assert_eq!(
            format_published_tags(&tags),
            "Tagged 2 package(s): pika@0.0.2, @scope/ui@1.0.0"
        );
    }

    #[test]
    fn test_format_changed_paths_truncates() {
        let paths: Vec<PathBuf> = (0..7).map(|i| PathBuf::from(format!("src/{}.ts", i))).collect();
        let line = format_changed_paths(&paths);

        assert!(line.starts_with("Changed: src/0.ts, src/1.ts"));
        assert!(line.contains("src/4.ts"));
        assert!(!line.contains("src/5.ts"));
        assert!(line.ends_with("... and 2 more"));
    }
}
