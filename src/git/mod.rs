//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. All repository reads flow
//! through [`Git`]; no other module imports `git2`. Repository access
//! uses the `git2` crate exclusively (no shelling out to the git CLI).
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - HEAD branch and commit resolution
//! - Remote URL lookup
//! - Working tree dirtiness, including untracked files and recursion
//!   into initialized submodules
//! - Submodule enumeration (name, branch, pinned commit, url)
//!
//! # Invariants
//!
//! - All operations are read-only; this module never mutates a repository
//! - All operations return strong types ([`crate::core::types::Oid`],
//!   [`crate::core::types::BranchName`]) or typed [`GitError`] failures

mod interface;

pub use interface::{Git, GitError, SubmoduleFacts};
