use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use workspace_release::cli::{
    run_changelog_workflow, run_publish_workflow, ChangelogWorkflowArgs, PublishWorkflowArgs,
};
use workspace_release::config::{self, Config};
use workspace_release::git::Git2Repository;
use workspace_release::process::SystemCommandRunner;
use workspace_release::ui;
use workspace_release::watch::WatchBuild;

#[derive(Parser)]
#[command(
    name = "workspace-release",
    version,
    about = "Changelog, publish and re-tag automation for pnpm workspaces"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Show debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the changelog for a release tag and push it to the release branch
    Changelog {
        #[arg(long, env = "CI_COMMIT_TAG", help = "Release tag, <package>@<version>")]
        tag: String,

        #[arg(long, help = "Print the changelog without writing or pushing")]
        dry_run: bool,
    },
    /// Publish workspace packages and tag every published package
    Publish {
        #[arg(long, env = "REGISTRY", help = "Registry host or URL")]
        registry: String,
    },
    /// Build, then rebuild whenever watched sources change
    Watch,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    match args.command {
        Command::Changelog { tag, dry_run } => changelog(&config, tag, dry_run),
        Command::Publish { registry } => publish(&config, registry),
        Command::Watch => {
            let runner = SystemCommandRunner::new();
            WatchBuild::new(&runner, &config.watch)?.run()?;
            Ok(())
        }
    }
}

fn changelog(config: &Config, tag: String, dry_run: bool) -> Result<()> {
    let repo = Git2Repository::open(".")?;
    let runner = SystemCommandRunner::new();
    let args = ChangelogWorkflowArgs {
        tag,
        dry_run,
        date: chrono::Local::now().date_naive(),
    };

    let result = run_changelog_workflow(&repo, &runner, config, &args)?;
    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }

    match (&result.render, &result.written_to) {
        (Some(render), None) => ui::display_changelog_preview(render),
        (Some(_), Some(path)) => ui::display_success(&format!(
            "Changelog for {} written to {} and pushed",
            result.release,
            path.display()
        )),
        _ => {}
    }

    Ok(())
}

fn publish(config: &Config, registry: String) -> Result<()> {
    let repo = Git2Repository::open(".")?;
    let runner = SystemCommandRunner::new();

    let result = run_publish_workflow(&repo, &runner, config, &PublishWorkflowArgs { registry })?;
    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }
    if !result.tags.is_empty() {
        ui::display_published_tags(&result.tags);
    }

    Ok(())
}
