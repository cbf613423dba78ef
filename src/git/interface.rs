//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in
//! repotags. All repository introspection flows through this interface,
//! which provides structured results and normalizes errors into typed
//! failure categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::BareRepo`]: Repository has no working tree
//! - [`GitError::DetachedHead`]: HEAD is not on a branch
//! - [`GitError::RemoteNotFound`]: Requested remote does not exist
//! - [`GitError::SubmoduleBroken`]: Submodule record cannot be read
//!
//! # Example
//!
//! ```ignore
//! use repotags::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."), false)?;
//! println!("HEAD is at {}", git.head_oid()?.short(7));
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{BranchName, Oid, TypeError};

/// Branch recorded for a submodule when `.gitmodules` carries no
/// `branch` entry. Matches git's historical default.
const DEFAULT_SUBMODULE_BRANCH: &str = "master";

/// Errors from Git operations.
///
/// These error types cover the categories of Git failures that the tag
/// extractor needs to handle distinctly. Anything not worth a category
/// of its own lands in [`GitError::Internal`] and is propagated
/// verbatim.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// HEAD is detached or unborn; there is no active branch to record.
    #[error("HEAD is detached or unborn; an active branch is required")]
    DetachedHead,

    /// Requested remote does not exist.
    #[error("remote not found: {name}")]
    RemoteNotFound {
        /// The remote that was looked up
        name: String,
    },

    /// A submodule record is missing required facts.
    #[error("submodule '{name}' is unusable: {message}")]
    SubmoduleBroken {
        /// The submodule's name (or path, when the name is unreadable)
        name: String,
        /// Description of the problem
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        GitError::Internal {
            message: err.to_string(),
        }
    }
}

/// Facts recorded in the parent repository for one submodule.
///
/// These come from the parent's `.gitmodules` and tree, not from the
/// submodule's own checkout: the pinned commit is what the parent would
/// reproduce, regardless of where the submodule working tree currently
/// sits.
#[derive(Debug, Clone)]
pub struct SubmoduleFacts {
    /// Name, unique within the parent; namespaces the submodule's tag keys
    pub name: String,
    /// Branch configured in `.gitmodules` (`"master"` when unset)
    pub branch: BranchName,
    /// Commit the parent pins the submodule at
    pub head: Oid,
    /// Source URL the submodule is cloned from
    pub url: String,
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. All repository
/// reads flow through this interface. No other module imports `git2`.
///
/// Every operation is read-only: repotags records repository state, it
/// never changes it.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open a repository at the given path.
    ///
    /// With `search_parents` set, uses `git2::Repository::discover` to
    /// walk upward from `path` to the repository root, so `path` can be
    /// any directory within the repository. Otherwise `path` itself must
    /// be the repository root.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path, search_parents: bool) -> Result<Self, GitError> {
        let repo = if search_parents {
            git2::Repository::discover(path)
        } else {
            git2::Repository::open(path)
        }
        .map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        // A bare repository has no checkout to reproduce
        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    // =========================================================================
    // HEAD Resolution
    // =========================================================================

    /// Get the current branch name.
    ///
    /// # Errors
    ///
    /// - [`GitError::DetachedHead`] if HEAD is detached or unborn
    pub fn head_branch(&self) -> Result<BranchName, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                return Err(GitError::DetachedHead)
            }
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(BranchName::new(name)?);
            }
        }

        Err(GitError::DetachedHead)
    }

    /// Get the HEAD commit OID (full hash).
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let oid = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?
            .id();

        Ok(Oid::new(oid.to_string())?)
    }

    // =========================================================================
    // Remotes
    // =========================================================================

    /// Get the URL for a remote.
    ///
    /// # Errors
    ///
    /// - [`GitError::RemoteNotFound`] if the remote doesn't exist
    pub fn remote_url(&self, name: &str) -> Result<String, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => remote
                .url()
                .map(String::from)
                .ok_or_else(|| GitError::Internal {
                    message: format!("remote '{name}' URL is not valid UTF-8"),
                }),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Err(GitError::RemoteNotFound {
                name: name.to_string(),
            }),
            Err(e) => Err(GitError::from_git2(e, name)),
        }
    }

    // =========================================================================
    // Working Tree Dirtiness
    // =========================================================================

    /// Check whether the working tree differs from the last commit.
    ///
    /// Any staged, unstaged, renamed, or conflicted entry counts as
    /// dirty. With `include_untracked`, files unknown to git count too.
    /// With `recurse_submodules`, the same check runs inside every
    /// initialized submodule working tree, recursively; a dirty
    /// submodule makes the parent dirty even when the parent's own tree
    /// is clean.
    ///
    /// Uninitialized submodules have no checkout to inspect and are
    /// skipped.
    pub fn is_dirty(
        &self,
        include_untracked: bool,
        recurse_submodules: bool,
    ) -> Result<bool, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(include_untracked)
            .recurse_untracked_dirs(include_untracked)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;

        if !statuses.is_empty() {
            return Ok(true);
        }

        if recurse_submodules {
            for sub in self.repo.submodules().map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })? {
                let sub_repo = match sub.open() {
                    Ok(repo) => repo,
                    Err(_) => continue, // not checked out
                };
                let sub_git = Git { repo: sub_repo };
                if sub_git.is_dirty(include_untracked, true)? {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    // =========================================================================
    // Submodules
    // =========================================================================

    /// Enumerate the submodules recorded in this repository.
    ///
    /// Order is whatever git2 reports (`.gitmodules` order); callers
    /// must not rely on it.
    ///
    /// # Errors
    ///
    /// - [`GitError::SubmoduleBroken`] if a record lacks a usable name,
    ///   pinned commit, or url
    pub fn submodules(&self) -> Result<Vec<SubmoduleFacts>, GitError> {
        let subs = self.repo.submodules().map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;

        let mut facts = Vec::with_capacity(subs.len());
        for sub in subs {
            let name = match sub.name() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    return Err(GitError::SubmoduleBroken {
                        name: sub.path().display().to_string(),
                        message: "name is missing or not valid UTF-8".into(),
                    })
                }
            };

            let branch = BranchName::new(sub.branch().unwrap_or(DEFAULT_SUBMODULE_BRANCH))
                .map_err(|e| GitError::SubmoduleBroken {
                    name: name.clone(),
                    message: e.to_string(),
                })?;

            // Prefer the pin in HEAD; a freshly `submodule add`ed entry
            // only exists in the index yet.
            let pinned = sub
                .head_id()
                .or_else(|| sub.index_id())
                .or_else(|| sub.workdir_id())
                .ok_or_else(|| GitError::SubmoduleBroken {
                    name: name.clone(),
                    message: "no recorded commit".into(),
                })?;
            let head = Oid::new(pinned.to_string()).map_err(|e| GitError::SubmoduleBroken {
                name: name.clone(),
                message: e.to_string(),
            })?;

            let url = sub
                .url()
                .map(String::from)
                .ok_or_else(|| GitError::SubmoduleBroken {
                    name: name.clone(),
                    message: "url is missing or not valid UTF-8".into(),
                })?;

            facts.push(SubmoduleFacts {
                name,
                branch,
                head,
                url,
            });
        }

        Ok(facts)
    }
}
