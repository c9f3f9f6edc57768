// tests/config_test.rs
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use workspace_release::config::{load_config, Config, CONFIG_FILE_NAME};
use workspace_release::ReleaseError;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.release_branch, "master");
    assert_eq!(config.remote, "origin");
    assert_eq!(config.tag_scan_limit, 50);
    assert_eq!(config.changelog_file, "CHANGELOG.md");
    assert_eq!(config.bot_author, "bot");
    assert_eq!(config.repository_url, None);
    assert_eq!(config.watch.root, "./packages");
    assert_eq!(config.watch.debounce_ms, 500);
    assert_eq!(config.watch.build_command, vec!["pnpm", "run", "build"]);
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
release_branch = "main"
tag_scan_limit = 100
repository_url = "https://git.acme.io/tools"

[watch]
root = "./libs"
build_command = ["npm", "run", "build:all"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.release_branch, "main");
    assert_eq!(config.tag_scan_limit, 100);
    assert_eq!(config.repository_url.as_deref(), Some("https://git.acme.io/tools"));
    assert_eq!(config.watch.root, "./libs");
    assert_eq!(config.watch.build_command, vec!["npm", "run", "build:all"]);
    // untouched fields keep their defaults
    assert_eq!(config.remote, "origin");
    assert_eq!(config.watch.debounce_ms, 500);
}

#[test]
fn test_missing_explicit_file_is_config_error() {
    let err = load_config(Some("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, ReleaseError::Config(_)));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"tag_scan_limit = \"many\"").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(matches!(err, ReleaseError::Config(_)));
}

#[test]
#[serial]
fn test_loads_file_from_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "remote = \"upstream\"\n").unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original).unwrap();

    assert_eq!(result.unwrap().remote, "upstream");
}
