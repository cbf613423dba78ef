//! tags::extract
//!
//! Tag extraction: options, output mapping, and the extraction
//! algorithm itself.
//!
//! # Algorithm
//!
//! 1. Resolve the repository (entry points only)
//! 2. Unless suppressed, refuse to proceed if the working tree - or any
//!    initialized submodule tree, recursively - is dirty
//! 3. Record branch, hash, and origin for the main repository
//! 4. Record branch, hash, and origin for each submodule, under
//!    `{prefix}-submodule-{name}-*` keys
//!
//! The dirtiness gate comes first: when it fails, nothing is read and
//! nothing is returned. There are no partial mappings.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::git::{Git, GitError};
use crate::tags::source::RepoSource;

/// Key prefix used when the caller provides none (or an empty string).
const DEFAULT_PREFIX: &str = "git";

/// Errors from tag extraction.
///
/// A closed set: callers branch on the kind to decide whether to abort
/// the surrounding run (state can't be reproduced), point the user at
/// the right directory (no repository), or treat the failure as fatal
/// corruption (everything else).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The working tree (or a submodule's) holds uncommitted or
    /// untracked changes, so the recorded hashes would not describe the
    /// code actually running.
    #[error(
        "repository has uncommitted or untracked changes; \
         commit, stash, or restore them before recording tags \
         (or opt out of the check with `suppress`)"
    )]
    UnreproducibleState,

    /// No git repository at (or, with parent search, above) the path.
    #[error("no git repository found at {path}")]
    NotFound {
        /// The path that was searched
        path: PathBuf,
    },

    /// Two submodule records share a name; their keys would collide and
    /// one set of facts would be silently lost.
    #[error("duplicate submodule name: {name}")]
    DuplicateSubmodule {
        /// The repeated name
        name: String,
    },

    /// Any other repository query failure, propagated verbatim.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Options for tag extraction.
///
/// # Example
///
/// ```
/// use repotags::TagOptions;
///
/// let options = TagOptions {
///     prefix: "exp".to_string(),
///     ..TagOptions::default()
/// };
/// assert!(!options.suppress);
/// ```
#[derive(Debug, Clone)]
pub struct TagOptions {
    /// Prefix namespacing every output key. Empty is treated as unset
    /// and replaced with `"git"`.
    pub prefix: String,
    /// Walk upward from the given location to find the repository root,
    /// instead of requiring the location to be the root itself.
    pub search_parent_directories: bool,
    /// Skip the clean-tree check entirely. The returned mapping then
    /// describes a state that may not be reconstructible.
    pub suppress: bool,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            search_parent_directories: false,
            suppress: false,
        }
    }
}

/// The extracted tags: a flat, ordered `String -> String` mapping.
///
/// Built fresh on every extraction; plain value data with no handle
/// back to the repository. Serializes as a flat JSON object, ready for
/// an experiment tracker's parameter API.
///
/// # Example
///
/// ```
/// use repotags::TagMapping;
///
/// let tags = TagMapping::default();
/// assert!(tags.is_empty());
/// assert_eq!(tags.get("git-hash"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagMapping(BTreeMap<String, String>);

impl TagMapping {
    fn insert(&mut self, key: String, value: String) {
        self.0.insert(key, value);
    }

    /// Look up a tag value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping holds no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the mapping, yielding the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl IntoIterator for TagMapping {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagMapping {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Extract tags from the repository at the process working directory.
///
/// See [`extract_tags_from`] for the algorithm and error conditions.
pub fn extract_tags(options: &TagOptions) -> Result<TagMapping, ExtractError> {
    extract_tags_in(Path::new("."), options)
}

/// Extract tags from the repository at (or, with
/// [`TagOptions::search_parent_directories`], above) `path`.
pub fn extract_tags_in(path: &Path, options: &TagOptions) -> Result<TagMapping, ExtractError> {
    let git = Git::open(path, options.search_parent_directories).map_err(|e| match e {
        GitError::NotARepo { path } => ExtractError::NotFound { path },
        other => ExtractError::Git(other),
    })?;

    extract_tags_from(&git, options)
}

/// Extract tags from an already-resolved repository source.
///
/// This is the extractor core: pure over the [`RepoSource`] capability
/// trait, a single linear sequence of read-only queries with one gate.
///
/// # Errors
///
/// - [`ExtractError::UnreproducibleState`] when the tree is dirty
///   (untracked files and submodule trees included) and
///   [`TagOptions::suppress`] is off. Nothing is returned; there are no
///   partial mappings.
/// - [`ExtractError::DuplicateSubmodule`] when two submodules share a
///   name: their keys would collide and facts would be silently lost.
/// - [`ExtractError::Git`] for any underlying query failure, verbatim.
///
/// # Example
///
/// ```ignore
/// use repotags::{extract_tags_from, RepoSource, TagOptions};
///
/// fn record(source: &impl RepoSource) -> Result<(), repotags::ExtractError> {
///     let tags = extract_tags_from(source, &TagOptions::default())?;
///     assert!(tags.contains_key("git-hash"));
///     Ok(())
/// }
/// ```
pub fn extract_tags_from(
    source: &impl RepoSource,
    options: &TagOptions,
) -> Result<TagMapping, ExtractError> {
    // The gate: a dirty tree cannot be reconstructed from hashes alone.
    // Untracked files and submodule recursion are deliberately coupled
    // into one check; a clean parent over a dirty submodule still fails.
    if !options.suppress && source.is_dirty(true, true)? {
        return Err(ExtractError::UnreproducibleState);
    }

    let prefix = if options.prefix.is_empty() {
        DEFAULT_PREFIX
    } else {
        options.prefix.as_str()
    };

    let mut tags = TagMapping::default();
    tags.insert(format!("{prefix}-branch"), source.head_branch()?.to_string());
    tags.insert(format!("{prefix}-hash"), source.head_oid()?.to_string());
    tags.insert(format!("{prefix}-origin"), source.remote_url("origin")?);

    let mut seen = BTreeSet::new();
    for sub in source.submodules()? {
        if !seen.insert(sub.name.clone()) {
            return Err(ExtractError::DuplicateSubmodule { name: sub.name });
        }

        let sub_prefix = format!("{prefix}-submodule-{}", sub.name);
        tags.insert(format!("{sub_prefix}-branch"), sub.branch.to_string());
        tags.insert(format!("{sub_prefix}-hash"), sub.head.to_string());
        tags.insert(format!("{sub_prefix}-origin"), sub.url);
    }

    Ok(tags)
}
