// tests/git2_repository_test.rs
use git2::{Oid, Repository as Git2Repo, ResetType, Signature, Time};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use workspace_release::domain::parse_raw_commits;
use workspace_release::git::{Git2Repository, Repository};

const BASE_TIME: i64 = 1_790_000_000;

fn signature(email: &str, seconds: i64) -> Signature<'static> {
    Signature::new("Someone", email, &Time::new(seconds, 0)).unwrap()
}

/// Write `file` and commit it on HEAD
fn commit_file(repo: &Git2Repo, file: &str, subject: &str, email: &str, seconds: i64) -> Oid {
    let workdir = repo.workdir().unwrap();
    let path = workdir.join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("{}\n", subject)).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => vec![],
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    let sig = signature(email, seconds);
    repo.commit(Some("HEAD"), &sig, &sig, subject, &tree, &parent_refs)
        .unwrap()
}

fn tag_lightweight(repo: &Git2Repo, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

/// Commit the index plus `file` with two parents, as `git merge --no-ff` would
fn merge_commit(repo: &Git2Repo, file: &str, content: &str, theirs: Oid, subject: &str, seconds: i64) -> Oid {
    let path = repo.workdir().unwrap().join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let ours = repo.head().unwrap().peel_to_commit().unwrap();
    let theirs = repo.find_commit(theirs).unwrap();
    let sig = signature("ann@acme.io", seconds);
    repo.commit(Some("HEAD"), &sig, &sig, subject, &tree, &[&ours, &theirs])
        .unwrap()
}

/// Workspace with two packages and three releases of `pika`
fn workspace() -> (TempDir, Git2Repo) {
    let dir = TempDir::new().unwrap();
    let repo = Git2Repo::init(dir.path()).unwrap();

    let c1 = commit_file(&repo, "packages/pika/index.ts", "feat: initial pika", "ann@acme.io", BASE_TIME);
    tag_lightweight(&repo, "pika@0.0.1", c1);

    commit_file(&repo, "packages/pika/search.ts", "feat: add search (#12)", "ann@acme.io", BASE_TIME + 100);
    commit_file(&repo, "packages/ui/button.ts", "fix: button color", "bob@acme.io", BASE_TIME + 200);
    let c4 = commit_file(&repo, "packages/pika/index.ts", "fix: crash on empty input", "bob@acme.io", BASE_TIME + 300);
    tag_lightweight(&repo, "pika@0.0.2", c4);

    let c5 = commit_file(&repo, "packages/ui/button.ts", "chore: ui release", "bot", BASE_TIME + 400);
    {
        let target = repo.find_object(c5, None).unwrap();
        repo.tag(
            "ui@1.0.0",
            &target,
            &signature("bot", BASE_TIME + 500),
            "ui@1.0.0",
            false,
        )
        .unwrap();
    }

    (dir, repo)
}

#[test]
fn test_recent_tags_newest_first() {
    let (_dir, repo) = workspace();
    let repo = Git2Repository::from_git2(repo);

    assert_eq!(
        repo.recent_tags(50).unwrap(),
        vec!["ui@1.0.0", "pika@0.0.2", "pika@0.0.1"]
    );
    assert_eq!(repo.recent_tags(2).unwrap(), vec!["ui@1.0.0", "pika@0.0.2"]);
}

#[test]
fn test_raw_commits_between_whole_repository() {
    let (_dir, repo) = workspace();
    let repo = Git2Repository::from_git2(repo);

    let raw = repo.raw_commits_between("pika@0.0.1", "pika@0.0.2", None).unwrap();
    let subjects: Vec<String> = parse_raw_commits(&raw).into_iter().map(|c| c.subject).collect();

    assert_eq!(
        subjects,
        vec!["fix: crash on empty input", "fix: button color", "feat: add search"]
    );
}

#[test]
fn test_raw_commits_between_scoped_to_package() {
    let (dir, repo) = workspace();
    let repo = Git2Repository::from_git2(repo);
    let package = dir.path().join("packages").join("pika");

    let raw = repo
        .raw_commits_between("pika@0.0.1", "pika@0.0.2", Some(&package))
        .unwrap();
    let commits = parse_raw_commits(&raw);

    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].subject, "fix: crash on empty input");
    assert_eq!(commits[0].author, "bob@acme.io");
    assert_eq!(commits[0].hash.len(), 40);
    assert!(commits[0].date.ends_with("+0000"));
    assert_eq!(commits[1].subject, "feat: add search");
}

#[test]
fn test_raw_commits_between_unknown_tag() {
    let (_dir, repo) = workspace();
    let repo = Git2Repository::from_git2(repo);

    assert!(repo.raw_commits_between("pika@9.9.9", "pika@0.0.2", None).is_err());
}

#[test]
fn test_remote_url() {
    let (_dir, repo) = workspace();
    repo.remote("origin", "git@github.com:acme/tools.git").unwrap();
    let repo = Git2Repository::from_git2(repo);

    assert_eq!(
        repo.remote_url("origin").unwrap().as_deref(),
        Some("git@github.com:acme/tools.git")
    );
    assert_eq!(repo.remote_url("upstream").unwrap(), None);
}

#[test]
fn test_create_and_push_tag_to_local_remote() {
    let (_dir, repo) = workspace();
    let remote_dir = TempDir::new().unwrap();
    let remote = Git2Repo::init_bare(remote_dir.path()).unwrap();
    repo.remote("origin", remote_dir.path().to_str().unwrap()).unwrap();

    let head = repo.head().unwrap().peel_to_commit().unwrap().id();
    let repo = Git2Repository::from_git2(repo);

    repo.create_tag("ui@1.0.1").unwrap();
    assert!(repo.create_tag("ui@1.0.1").is_err());

    repo.push_tag("origin", "ui@1.0.1").unwrap();
    let pushed = remote.find_reference("refs/tags/ui@1.0.1").unwrap();
    assert_eq!(pushed.target(), Some(head));
}

#[test]
fn test_push_tag_unknown_remote() {
    let (_dir, repo) = workspace();
    let repo = Git2Repository::from_git2(repo);

    assert!(repo.push_tag("nowhere", "pika@0.0.2").is_err());
}

#[test]
fn test_scoped_range_prunes_merges_that_only_bring_in_a_branch() {
    let dir = TempDir::new().unwrap();
    let repo = Git2Repo::init(dir.path()).unwrap();

    let base = commit_file(&repo, "packages/pika/index.ts", "feat: initial pika", "ann@acme.io", BASE_TIME);
    tag_lightweight(&repo, "pika@0.0.1", base);

    let side = commit_file(&repo, "packages/pika/side.ts", "feat: side work", "bob@acme.io", BASE_TIME + 100);
    {
        let base_object = repo.find_object(base, None).unwrap();
        repo.reset(&base_object, ResetType::Hard, None).unwrap();
    }
    commit_file(&repo, "packages/ui/button.ts", "fix: button color", "ann@acme.io", BASE_TIME + 200);
    let merge = merge_commit(
        &repo,
        "packages/pika/side.ts",
        "feat: side work\n",
        side,
        "Merge branch 'side'",
        BASE_TIME + 300,
    );
    tag_lightweight(&repo, "pika@0.0.2", merge);

    let repo = Git2Repository::from_git2(repo);
    let package = dir.path().join("packages").join("pika");
    let subjects = |path: Option<&Path>| -> Vec<String> {
        let raw = repo.raw_commits_between("pika@0.0.1", "pika@0.0.2", path).unwrap();
        parse_raw_commits(&raw).into_iter().map(|c| c.subject).collect()
    };

    assert_eq!(subjects(Some(package.as_path())), vec!["feat: side work"]);
    assert_eq!(
        subjects(None),
        vec!["Merge branch 'side'", "fix: button color", "feat: side work"]
    );
}

#[cfg(unix)]
#[test]
fn test_scoped_range_through_symlinked_path() {
    let (dir, repo) = workspace();
    let repo = Git2Repository::from_git2(repo);
    let links = TempDir::new().unwrap();
    let link = links.path().join("checkout");
    std::os::unix::fs::symlink(dir.path(), &link).unwrap();

    let raw = repo
        .raw_commits_between("pika@0.0.1", "pika@0.0.2", Some(&link.join("packages").join("pika")))
        .unwrap();
    let subjects: Vec<String> = parse_raw_commits(&raw).into_iter().map(|c| c.subject).collect();

    assert_eq!(subjects, vec!["fix: crash on empty input", "feat: add search"]);
}
