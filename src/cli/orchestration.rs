//! Release workflow orchestration
//!
//! The changelog and publish workflows, separated from CLI argument parsing
//! in `main.rs`. Collaborators are passed in as [Repository] and
//! [CommandRunner] implementations so the workflows can be driven by mocks.

use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::analyzer::TagResolver;
use crate::boundary::BoundaryWarning;
use crate::changelog::{prepend_changelog, CategorizedCommits, ChangelogRender, ChangelogRenderer};
use crate::config::Config;
use crate::domain::ReleaseTag;
use crate::error::{ReleaseError, Result};
use crate::git::{web_url_from_remote, GitCli, Repository};
use crate::process::CommandRunner;
use crate::registry::{parse_published_packages, PackageManager};
use crate::ui;

/// Arguments for the changelog workflow
///
/// Mirrors the CLI arguments without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogWorkflowArgs {
    /// Tag being released, `name@version`
    pub tag: String,
    /// Render and print only
    pub dry_run: bool,
    /// Date printed in the changelog titles
    pub date: NaiveDate,
}

/// Result of a changelog workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogResult {
    pub release: ReleaseTag,
    /// Tag the release was diffed against, absent when none exists
    pub previous_tag: Option<String>,
    pub render: Option<ChangelogRender>,
    /// Changelog file written, absent on dry runs and skips
    pub written_to: Option<PathBuf>,
    pub warnings: Vec<BoundaryWarning>,
}

impl ChangelogResult {
    fn skipped(release: ReleaseTag, warning: BoundaryWarning) -> Self {
        ChangelogResult {
            release,
            previous_tag: None,
            render: None,
            written_to: None,
            warnings: vec![warning],
        }
    }
}

/// Arguments for the publish workflow
#[derive(Debug, Clone, PartialEq)]
pub struct PublishWorkflowArgs {
    /// Registry host or URL
    pub registry: String,
}

/// Result of a publish workflow run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PublishResult {
    /// Tags created and pushed, one per published package
    pub tags: Vec<ReleaseTag>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Browsable repository URL: configured, or derived from the remote
fn repository_url<R: Repository>(repo: &R, config: &Config) -> Result<String> {
    if let Some(url) = &config.repository_url {
        return Ok(url.clone());
    }

    let remote_url = repo.remote_url(&config.remote)?.ok_or_else(|| {
        ReleaseError::config(format!(
            "Remote '{}' not found; set repository_url in the configuration",
            config.remote
        ))
    })?;

    web_url_from_remote(&remote_url).ok_or_else(|| {
        ReleaseError::config(format!(
            "Cannot derive a repository URL from '{}'; set repository_url in the configuration",
            remote_url
        ))
    })
}

/// Changelog workflow
///
/// 1. Parse the release tag
/// 2. Fetch full history and tags
/// 3. Resolve the previous tag of the same package
/// 4. Collect, classify and render the package's commits in between
/// 5. Unless dry-running: switch to the release branch, prepend the
///    changelog, commit and push
pub fn run_changelog_workflow<R: Repository, C: CommandRunner>(
    repo: &R,
    runner: &C,
    config: &Config,
    args: &ChangelogWorkflowArgs,
) -> Result<ChangelogResult> {
    let release = ReleaseTag::parse(&args.tag)
        .map_err(|e| ReleaseError::config(format!("Invalid release tag: {}", e)))?;
    info!(release = %release, dry_run = args.dry_run, "changelog workflow");

    let git = GitCli::new(runner);
    ui::display_status("Fetching history and tags...");
    git.fetch_history()?;

    let previous_tag = match TagResolver::new(config.tag_scan_limit).resolve(repo, &release)? {
        Some(tag) => tag,
        None => {
            return Ok(ChangelogResult::skipped(
                release.clone(),
                BoundaryWarning::NoPreviousTag {
                    tag: release.to_string(),
                },
            ))
        }
    };
    ui::display_status(&format!("Generating changelog {}...{}", previous_tag, release));

    let package_manager = PackageManager::new(runner, config.package_manager.as_str());
    let package_path = package_manager.workspace_path(&release.package_name)?;
    debug!(path = %package_path.display(), "package directory");

    let to = release.to_string();
    let raw_log = repo.raw_commits_between(&previous_tag, &to, Some(&package_path))?;
    debug!(raw_log = %raw_log, "raw commit log");

    let commits = CategorizedCommits::from_raw_log(&raw_log);
    let mut warnings = Vec::new();
    if commits.is_empty() {
        warnings.push(BoundaryWarning::NoCommitsInRange {
            from: previous_tag.clone(),
            to: to.clone(),
        });
    }

    let renderer = ChangelogRenderer::new(repository_url(repo, config)?, config.bot_author.as_str());
    let render = renderer.render(&commits, &previous_tag, &to, args.date);

    if args.dry_run {
        return Ok(ChangelogResult {
            release,
            previous_tag: Some(previous_tag),
            render: Some(render),
            written_to: None,
            warnings,
        });
    }

    if git.ensure_on_branch(&config.release_branch)? {
        ui::display_status(&format!("Switched to {}", config.release_branch));
    }

    let changelog_path = package_path.join(&config.changelog_file);
    prepend_changelog(&changelog_path, &render.markdown)?;
    git.commit_and_push(
        &changelog_path,
        &config.commit_message_for(&to),
        &config.remote,
        &config.release_branch,
    )?;

    Ok(ChangelogResult {
        release,
        previous_tag: Some(previous_tag),
        render: Some(render),
        written_to: Some(changelog_path),
        warnings,
    })
}

/// Publish workflow
///
/// Publishes every workspace package, then creates and pushes one
/// `name@version` tag per package the registry accepted.
pub fn run_publish_workflow<R: Repository, C: CommandRunner>(
    repo: &R,
    runner: &C,
    config: &Config,
    args: &PublishWorkflowArgs,
) -> Result<PublishResult> {
    ui::display_status("Publishing workspace packages...");
    let output = PackageManager::new(runner, config.package_manager.as_str()).publish(&args.registry)?;
    ui::display_command_output(&output.combined());

    let published = parse_published_packages(&output.stdout);
    let mut result = PublishResult {
        warnings: published
            .unparsable
            .into_iter()
            .map(|line| BoundaryWarning::UnparsablePublishLine { line })
            .collect(),
        ..PublishResult::default()
    };

    if published.tags.is_empty() {
        result.warnings.push(BoundaryWarning::NoPackagesPublished);
        return Ok(result);
    }

    for tag in published.tags {
        let name = tag.to_string();
        repo.create_tag(&name)?;
        repo.push_tag(&config.remote, &name)?;
        info!(tag = %name, remote = %config.remote, "tag pushed");
        result.tags.push(tag);
    }

    Ok(result)
}
