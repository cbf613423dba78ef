//! tags::source
//!
//! Capability trait the tag extractor reads repositories through.
//!
//! The extractor never talks to git2 directly; it asks a [`RepoSource`]
//! the five questions it needs answered. [`Git`] is the production
//! binding. Tests substitute an in-memory implementation, which keeps
//! the extractor's behavior (key scheme, prefix handling, duplicate
//! detection, gate ordering) testable without a repository on disk.

use crate::core::types::{BranchName, Oid};
use crate::git::{Git, GitError, SubmoduleFacts};

/// Read-only repository facts required for tag extraction.
///
/// All methods are queries; implementations must not mutate the
/// repository. Failures use the [`GitError`] taxonomy so the extractor
/// can propagate them verbatim.
pub trait RepoSource {
    /// The currently checked-out branch.
    fn head_branch(&self) -> Result<BranchName, GitError>;

    /// The commit HEAD points at (full hash).
    fn head_oid(&self) -> Result<Oid, GitError>;

    /// URL of the named remote.
    fn remote_url(&self, name: &str) -> Result<String, GitError>;

    /// Whether the working tree differs from the last commit.
    ///
    /// `include_untracked` counts files unknown to git;
    /// `recurse_submodules` extends the check into every initialized
    /// submodule working tree.
    fn is_dirty(&self, include_untracked: bool, recurse_submodules: bool)
        -> Result<bool, GitError>;

    /// Submodules recorded in this repository, in source order.
    fn submodules(&self) -> Result<Vec<SubmoduleFacts>, GitError>;
}

impl RepoSource for Git {
    fn head_branch(&self) -> Result<BranchName, GitError> {
        Git::head_branch(self)
    }

    fn head_oid(&self) -> Result<Oid, GitError> {
        Git::head_oid(self)
    }

    fn remote_url(&self, name: &str) -> Result<String, GitError> {
        Git::remote_url(self, name)
    }

    fn is_dirty(
        &self,
        include_untracked: bool,
        recurse_submodules: bool,
    ) -> Result<bool, GitError> {
        Git::is_dirty(self, include_untracked, recurse_submodules)
    }

    fn submodules(&self) -> Result<Vec<SubmoduleFacts>, GitError> {
        Git::submodules(self)
    }
}
