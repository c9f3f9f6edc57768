use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "workspace-release.toml";

/// Represents the complete configuration for workspace-release.
///
/// Contains the release branch and remote, changelog rendering options,
/// the package manager to drive, and the watch-build settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_release_branch")]
    pub release_branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// How many of the most recently created tags are considered when
    /// resolving the previous release.
    #[serde(default = "default_tag_scan_limit")]
    pub tag_scan_limit: usize,

    #[serde(default = "default_changelog_file")]
    pub changelog_file: String,

    /// Commit message template; `{tag}` is replaced by the released tag.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Web URL used for compare and commit links. Derived from the remote
    /// URL when absent.
    #[serde(default)]
    pub repository_url: Option<String>,

    /// Author identity whose commits are hidden from the Internal section.
    #[serde(default = "default_bot_author")]
    pub bot_author: String,

    #[serde(default = "default_package_manager")]
    pub package_manager: String,

    #[serde(default)]
    pub watch: WatchConfig,
}

fn default_release_branch() -> String {
    "master".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_scan_limit() -> usize {
    50
}

fn default_changelog_file() -> String {
    "CHANGELOG.md".to_string()
}

fn default_commit_message() -> String {
    "chore(changelog): {tag} [CI SKIP]".to_string()
}

fn default_bot_author() -> String {
    "bot".to_string()
}

fn default_package_manager() -> String {
    "pnpm".to_string()
}

/// Configuration for the watch-build loop.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WatchConfig {
    #[serde(default = "default_watch_root")]
    pub root: String,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Program followed by its arguments.
    #[serde(default = "default_build_command")]
    pub build_command: Vec<String>,

    /// Regex matched against paths relative to `root`.
    #[serde(default = "default_ignore")]
    pub ignore: String,
}

fn default_watch_root() -> String {
    "./packages".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_build_command() -> Vec<String> {
    vec!["pnpm".to_string(), "run".to_string(), "build".to_string()]
}

fn default_ignore() -> String {
    r"(^|[/\\])\..|node_modules|\.git|dist".to_string()
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            root: default_watch_root(),
            debounce_ms: default_debounce_ms(),
            build_command: default_build_command(),
            ignore: default_ignore(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            release_branch: default_release_branch(),
            remote: default_remote(),
            tag_scan_limit: default_tag_scan_limit(),
            changelog_file: default_changelog_file(),
            commit_message: default_commit_message(),
            repository_url: None,
            bot_author: default_bot_author(),
            package_manager: default_package_manager(),
            watch: WatchConfig::default(),
        }
    }
}

impl Config {
    /// Renders the changelog commit message for a released tag.
    pub fn commit_message_for(&self, tag: &str) -> String {
        self.commit_message.replace("{tag}", tag)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `workspace-release.toml` in current directory
/// 3. `.workspace-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)
            .map_err(|e| ReleaseError::config(format!("Cannot read {}: {}", path, e)))?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| ReleaseError::config(e.to_string()))
}
