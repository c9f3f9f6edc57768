//! Rebuild-on-change loop for workspace packages.

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::WatchConfig;
use crate::error::{ReleaseError, Result};
use crate::process::{render_command, CommandOutput, CommandRunner};
use crate::ui;

/// Watches a directory tree and reruns the build command on changes
pub struct WatchBuild<'a, C: CommandRunner> {
    runner: &'a C,
    root: PathBuf,
    /// `root` resolved, for events reported with absolute paths
    canonical_root: Option<PathBuf>,
    debounce: Duration,
    program: String,
    args: Vec<String>,
    ignore: Regex,
}

impl<'a, C: CommandRunner> WatchBuild<'a, C> {
    pub fn new(runner: &'a C, config: &WatchConfig) -> Result<Self> {
        let (program, args) = config
            .build_command
            .split_first()
            .ok_or_else(|| ReleaseError::config("watch.build_command is empty"))?;
        let ignore = Regex::new(&config.ignore)
            .map_err(|e| ReleaseError::config(format!("Invalid watch.ignore pattern: {}", e)))?;

        let root = PathBuf::from(&config.root);
        Ok(WatchBuild {
            runner,
            canonical_root: root.canonicalize().ok(),
            root,
            debounce: Duration::from_millis(config.debounce_ms),
            program: program.clone(),
            args: args.to_vec(),
            ignore,
        })
    }

    fn build(&self) -> Result<CommandOutput> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        info!(command = %render_command(&self.program, &args), "building");
        self.runner.run_checked(&self.program, &args, None)
    }

    /// Whether `path` matches the ignore pattern, relative to the watched root
    pub fn should_ignore(&self, path: &Path) -> bool {
        let relative = self
            .canonical_root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .or_else(|| path.strip_prefix(&self.root).ok())
            .unwrap_or(path);
        self.ignore.is_match(&relative.to_string_lossy())
    }

    /// Non-ignored paths of a batch, deduplicated in first-seen order
    pub fn relevant_paths(&self, paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
        let mut relevant: Vec<PathBuf> = Vec::new();
        for path in paths {
            if !self.should_ignore(&path) && !relevant.contains(&path) {
                relevant.push(path);
            }
        }
        relevant
    }

    /// Rebuild for a batch of changed paths.
    ///
    /// Returns whether a build ran. Build failures are reported, not returned.
    pub fn rebuild_for(&self, paths: impl IntoIterator<Item = PathBuf>) -> bool {
        let changed = self.relevant_paths(paths);
        if changed.is_empty() {
            return false;
        }

        ui::display_changed_paths(&changed);
        match self.build() {
            Ok(_) => ui::display_success("Build finished"),
            Err(e) => ui::display_error(&e.to_string()),
        }
        true
    }

    /// Handle one debounced batch from the watcher
    pub fn handle_batch(&self, result: DebounceEventResult) -> bool {
        match result {
            Ok(events) => self.rebuild_for(events.into_iter().flat_map(|e| e.event.paths)),
            Err(errors) => {
                for e in errors {
                    error!(error = %e, "watch error");
                    ui::display_error(&format!("Watch error: {}", e));
                }
                false
            }
        }
    }

    /// Build once, then rebuild on every relevant change until the watcher
    /// goes away. Only the first build and watcher setup are fatal.
    pub fn run(&self) -> Result<()> {
        ui::display_status("Running initial build...");
        let output = self.build()?;
        ui::display_command_output(&output.combined());
        ui::display_success("Initial build finished");

        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(self.debounce, None, move |result: DebounceEventResult| {
            if let Err(e) = tx.send(result) {
                error!("Failed to send event: {}", e);
            }
        })?;
        debouncer
            .watcher()
            .watch(&self.root, RecursiveMode::Recursive)?;

        ui::display_status(&format!("Watching {}", self.root.display()));
        let rebuilds = self.watch_batches(rx);
        debug!(rebuilds, "watcher closed");

        Ok(())
    }

    /// Handle batches until the source is exhausted. Returns the number of
    /// rebuilds that ran.
    pub fn watch_batches(&self, batches: impl IntoIterator<Item = DebounceEventResult>) -> usize {
        let mut rebuilds = 0;
        for result in batches {
            let rebuilt = self.handle_batch(result);
            debug!(rebuilt, "batch handled");
            if rebuilt {
                rebuilds += 1;
            }
        }
        rebuilds
    }
}
