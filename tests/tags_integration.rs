//! Integration tests for tag extraction.
//!
//! These tests use real git repositories created via tempfile to verify
//! that extraction works correctly against actual git state, including
//! submodules.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use repotags::git::GitError;
use repotags::{extract_tags_in, ExtractError, TagOptions};

const ORIGIN_URL: &str = "https://example.com/test-repo.git";

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit and an
    /// `origin` remote.
    fn new() -> Self {
        let repo = Self::without_origin();
        run_git(repo.path(), &["remote", "add", "origin", ORIGIN_URL]);
        repo
    }

    /// Create a new test repository with an initial commit but no
    /// remotes.
    fn without_origin() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self { dir }
    }

    /// Get the path to the repository.
    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get HEAD OID using git directly.
    fn head_oid_raw(&self) -> String {
        git_stdout(self.path(), &["rev-parse", "HEAD"])
    }

    /// Get the current branch name using git directly.
    fn branch_raw(&self) -> String {
        git_stdout(self.path(), &["rev-parse", "--abbrev-ref", "HEAD"])
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Run a git command and return its trimmed stdout.
fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// Add `sub` to `parent` as a submodule named `name`, tracking the
/// branch currently checked out in `sub`, and commit the result.
fn add_submodule(parent: &TestRepo, sub: &TestRepo, name: &str) {
    let branch = sub.branch_raw();
    run_git(
        parent.path(),
        &[
            "-c",
            "protocol.file.allow=always",
            "submodule",
            "add",
            "-b",
            &branch,
            sub.path().to_str().unwrap(),
            name,
        ],
    );
    run_git(parent.path(), &["commit", "-m", "Add submodule"]);
}

// =============================================================================
// Clean-Tree Gate
// =============================================================================

#[test]
fn clean_repo_yields_exactly_the_main_repo_keys() {
    let repo = TestRepo::new();
    let tags = extract_tags_in(repo.path(), &TagOptions::default()).unwrap();

    assert_eq!(tags.len(), 3);
    assert_eq!(tags.get("git-branch"), Some(repo.branch_raw().as_str()));
    assert_eq!(tags.get("git-hash"), Some(repo.head_oid_raw().as_str()));
    assert_eq!(tags.get("git-origin"), Some(ORIGIN_URL));
}

#[test]
fn untracked_file_fails_the_gate() {
    let repo = TestRepo::new();
    std::fs::write(repo.path().join("scratch.txt"), "wip\n").unwrap();

    let err = extract_tags_in(repo.path(), &TagOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::UnreproducibleState));
}

#[test]
fn modified_tracked_file_fails_the_gate() {
    let repo = TestRepo::new();
    std::fs::write(repo.path().join("README.md"), "# Edited\n").unwrap();

    let err = extract_tags_in(repo.path(), &TagOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::UnreproducibleState));
}

#[test]
fn staged_change_fails_the_gate() {
    let repo = TestRepo::new();
    std::fs::write(repo.path().join("new.txt"), "staged\n").unwrap();
    run_git(repo.path(), &["add", "new.txt"]);

    let err = extract_tags_in(repo.path(), &TagOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::UnreproducibleState));
}

#[test]
fn suppress_returns_tags_for_a_dirty_tree() {
    let repo = TestRepo::new();
    std::fs::write(repo.path().join("scratch.txt"), "wip\n").unwrap();

    let options = TagOptions {
        suppress: true,
        ..TagOptions::default()
    };
    let tags = extract_tags_in(repo.path(), &options).unwrap();

    assert_eq!(tags.get("git-hash"), Some(repo.head_oid_raw().as_str()));
    assert_eq!(tags.get("git-origin"), Some(ORIGIN_URL));
}

// =============================================================================
// Prefixes
// =============================================================================

#[test]
fn empty_prefix_matches_the_default() {
    let repo = TestRepo::new();
    let explicit = extract_tags_in(repo.path(), &TagOptions::default()).unwrap();

    let options = TagOptions {
        prefix: String::new(),
        ..TagOptions::default()
    };
    let empty = extract_tags_in(repo.path(), &options).unwrap();

    assert_eq!(explicit, empty);
    assert!(empty.contains_key("git-hash"));
}

#[test]
fn custom_prefix_renames_every_key() {
    let repo = TestRepo::new();
    let options = TagOptions {
        prefix: "exp".to_string(),
        ..TagOptions::default()
    };
    let tags = extract_tags_in(repo.path(), &options).unwrap();

    assert_eq!(tags.get("exp-hash"), Some(repo.head_oid_raw().as_str()));
    assert!(!tags.contains_key("git-hash"));
}

// =============================================================================
// Repository Resolution
// =============================================================================

#[test]
fn missing_repository_is_not_found() {
    let dir = TempDir::new().unwrap();

    let err = extract_tags_in(dir.path(), &TagOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::NotFound { .. }));
}

#[test]
fn subdirectory_requires_parent_search() {
    let repo = TestRepo::new();
    let subdir = repo.path().join("subdir");
    std::fs::create_dir(&subdir).unwrap();

    // The subdirectory is not itself a repository root
    let err = extract_tags_in(&subdir, &TagOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::NotFound { .. }));

    let options = TagOptions {
        search_parent_directories: true,
        ..TagOptions::default()
    };
    let tags = extract_tags_in(&subdir, &options).unwrap();
    assert_eq!(tags.get("git-hash"), Some(repo.head_oid_raw().as_str()));
}

// =============================================================================
// Error Propagation
// =============================================================================

#[test]
fn missing_origin_remote_propagates_as_git_error() {
    let repo = TestRepo::without_origin();

    let err = extract_tags_in(repo.path(), &TagOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::Git(GitError::RemoteNotFound { ref name }) if name.as_str() == "origin"
    ));
}

#[test]
fn detached_head_propagates_as_git_error() {
    let repo = TestRepo::new();
    run_git(repo.path(), &["checkout", "--detach"]);

    let err = extract_tags_in(repo.path(), &TagOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::Git(GitError::DetachedHead)));
}

// =============================================================================
// Submodules
// =============================================================================

#[test]
fn submodule_tags_are_namespaced_by_name() {
    let sub = TestRepo::new();
    let parent = TestRepo::new();
    add_submodule(&parent, &sub, "vendor-lib");

    let tags = extract_tags_in(parent.path(), &TagOptions::default()).unwrap();

    assert_eq!(tags.len(), 6);
    assert_eq!(
        tags.get("git-submodule-vendor-lib-branch"),
        Some(sub.branch_raw().as_str())
    );
    assert_eq!(
        tags.get("git-submodule-vendor-lib-hash"),
        Some(sub.head_oid_raw().as_str())
    );
    assert_eq!(
        tags.get("git-submodule-vendor-lib-origin"),
        Some(sub.path().to_str().unwrap())
    );
}

#[test]
fn dirty_submodule_fails_the_gate_for_a_clean_parent() {
    let sub = TestRepo::new();
    let parent = TestRepo::new();
    add_submodule(&parent, &sub, "vendor-lib");

    // Untracked file inside the submodule checkout; the parent's own
    // tracked files are untouched
    std::fs::write(parent.path().join("vendor-lib").join("junk.txt"), "x\n").unwrap();

    let err = extract_tags_in(parent.path(), &TagOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::UnreproducibleState));

    // Suppressing the check still yields all six keys
    let options = TagOptions {
        suppress: true,
        ..TagOptions::default()
    };
    let tags = extract_tags_in(parent.path(), &options).unwrap();
    assert_eq!(tags.len(), 6);
}
