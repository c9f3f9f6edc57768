//! Package-manager collaborator: workspace lookup and publishing.

use crate::domain::ReleaseTag;
use crate::error::{ReleaseError, Result};
use crate::process::{CommandOutput, CommandRunner};
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

/// One entry of `pnpm -r list --json --depth 0`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkspacePackage {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub private: bool,
}

/// Outcome of scanning publish output
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PublishedPackages {
    pub tags: Vec<ReleaseTag>,
    /// `+ ...` lines that did not hold a valid `name@version`
    pub unparsable: Vec<String>,
}

fn published_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+ (.*)").expect("valid publish output regex"))
}

/// Extract the packages a publish run reports as published.
///
/// pnpm prints one `+ <name>@<version>` line per package; a trailing
/// `.tgz` is tolerated.
pub fn parse_published_packages(output: &str) -> PublishedPackages {
    let mut published = PublishedPackages::default();

    for captures in published_line_regex().captures_iter(output) {
        let entry = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        let entry = entry.strip_suffix(".tgz").unwrap_or(entry);

        match ReleaseTag::parse(entry) {
            Ok(tag) => published.tags.push(tag),
            Err(e) => {
                debug!(entry, error = %e, "ignoring publish output line");
                published.unparsable.push(entry.to_string());
            }
        }
    }

    published
}

/// Prefix `https://` when the registry is given as a bare host
pub fn normalize_registry_url(registry: &str) -> String {
    let registry = registry.trim();
    if registry.contains("://") {
        registry.to_string()
    } else {
        format!("https://{}", registry)
    }
}

/// Drives the workspace package manager (pnpm by default)
pub struct PackageManager<'a, C: CommandRunner> {
    runner: &'a C,
    program: String,
}

impl<'a, C: CommandRunner> PackageManager<'a, C> {
    pub fn new(runner: &'a C, program: impl Into<String>) -> Self {
        PackageManager {
            runner,
            program: program.into(),
        }
    }

    /// All workspace packages
    pub fn list_workspace(&self) -> Result<Vec<WorkspacePackage>> {
        let output = self.runner.run_checked(
            &self.program,
            &["-r", "list", "--json", "--depth", "0"],
            None,
        )?;
        let packages: Vec<WorkspacePackage> = serde_json::from_str(&output.stdout)?;
        debug!(count = packages.len(), "listed workspace packages");
        Ok(packages)
    }

    /// Directory of the public workspace package called `name`
    pub fn workspace_path(&self, name: &str) -> Result<PathBuf> {
        self.list_workspace()?
            .into_iter()
            .find(|p| !p.private && p.name == name)
            .map(|p| p.path)
            .ok_or_else(|| {
                ReleaseError::config(format!(
                    "Package '{}' is not a public package of this workspace",
                    name
                ))
            })
    }

    /// Publish every workspace package to `registry`
    pub fn publish(&self, registry: &str) -> Result<CommandOutput> {
        let registry = normalize_registry_url(registry);
        self.runner.run_checked(
            &self.program,
            &["-r", "publish", "--no-git-checks", "--registry", &registry],
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingRunner;

    const LIST_OUTPUT: &str = r#"[
        {"name": "root", "version": "0.0.0", "path": "/repo", "private": true},
        {"name": "pika", "version": "0.0.2", "path": "/repo/packages/pika", "private": false},
        {"name": "@scope/ui", "version": "1.0.0", "path": "/repo/packages/ui"}
    ]"#;

    #[test]
    fn test_parse_published_packages() {
        let output = "\
Scope: all 3 workspace projects
+ pika@0.0.2
+ @scope/ui@1.0.0-beta.1
npm notice total files: 4
";
        let published = parse_published_packages(output);
        assert_eq!(
            published.tags,
            vec![
                ReleaseTag::new("pika", "0.0.2"),
                ReleaseTag::new("@scope/ui", "1.0.0-beta.1"),
            ]
        );
        assert!(published.unparsable.is_empty());
    }

    #[test]
    fn test_parse_published_tarball_names() {
        let published = parse_published_packages("+ @web-studio/universal-uikit@0.4.0.tgz\n");
        assert_eq!(
            published.tags,
            vec![ReleaseTag::new("@web-studio/universal-uikit", "0.4.0")]
        );
    }

    #[test]
    fn test_parse_published_ignores_garbage() {
        let published = parse_published_packages("+ something odd\nall good\n");
        assert!(published.tags.is_empty());
        assert_eq!(published.unparsable, vec!["something odd"]);
    }

    #[test]
    fn test_parse_published_empty() {
        assert_eq!(parse_published_packages(""), PublishedPackages::default());
    }

    #[test]
    fn test_normalize_registry_url() {
        assert_eq!(normalize_registry_url("npm.example.com"), "https://npm.example.com");
        assert_eq!(
            normalize_registry_url("http://localhost:4873"),
            "http://localhost:4873"
        );
    }

    #[test]
    fn test_workspace_path() {
        let runner = RecordingRunner::new();
        runner.respond("pnpm -r list", CommandOutput::ok(LIST_OUTPUT));
        let pm = PackageManager::new(&runner, "pnpm");

        assert_eq!(
            pm.workspace_path("pika").unwrap(),
            PathBuf::from("/repo/packages/pika")
        );
        assert_eq!(
            pm.workspace_path("@scope/ui").unwrap(),
            PathBuf::from("/repo/packages/ui")
        );
    }

    #[test]
    fn test_workspace_path_skips_private_and_unknown() {
        let runner = RecordingRunner::new();
        runner.respond("pnpm -r list", CommandOutput::ok(LIST_OUTPUT));
        let pm = PackageManager::new(&runner, "pnpm");

        assert!(matches!(pm.workspace_path("root"), Err(ReleaseError::Config(_))));
        assert!(matches!(pm.workspace_path("missing"), Err(ReleaseError::Config(_))));
    }

    #[test]
    fn test_invalid_list_output() {
        let runner = RecordingRunner::new();
        runner.respond("pnpm -r list", CommandOutput::ok("not json"));
        let pm = PackageManager::new(&runner, "pnpm");

        assert!(matches!(pm.list_workspace(), Err(ReleaseError::Json(_))));
    }

    #[test]
    fn test_publish_arguments() {
        let runner = RecordingRunner::new();
        PackageManager::new(&runner, "pnpm")
            .publish("npm.example.com")
            .unwrap();

        assert_eq!(
            runner.commands(),
            vec!["pnpm -r publish --no-git-checks --registry https://npm.example.com"]
        );
    }
}
