//! Repotags - reproducibility tags from a git working tree
//!
//! Repotags answers one question for experiment-tracking systems: *which
//! exact source state produced this run?* It reads the active branch,
//! commit hash, and origin URL of the repository at hand - plus the same
//! three facts for every submodule - and returns them as a flat
//! `String -> String` mapping ready to be attached to a run as
//! parameters or tags.
//!
//! # Architecture
//!
//! The codebase follows a small layered architecture:
//!
//! - [`core`] - Strong domain types (`BranchName`, `Oid`)
//! - [`git`] - Single interface for all Git operations
//! - [`tags`] - The tag extractor: options, output mapping, typed errors
//!
//! # Correctness Invariant
//!
//! Tags exist to make runs reproducible, so there is one hard gate: a
//! repository whose working tree holds uncommitted or untracked changes
//! (including inside any submodule) yields
//! [`ExtractError::UnreproducibleState`] rather than a mapping, unless
//! the caller explicitly opts out via [`TagOptions::suppress`]. A
//! mapping, once returned, always describes a state that can be checked
//! out again from the recorded hashes alone.
//!
//! # Example
//!
//! ```ignore
//! use repotags::{extract_tags, TagOptions};
//!
//! let tags = extract_tags(&TagOptions::default())?;
//! for (key, value) in &tags {
//!     println!("{key}={value}");
//! }
//! // git-branch=main
//! // git-hash=8077f7c47bc1ccc592187374a4bd5c967483910b
//! // git-origin=git@github.com:scenera/training.git
//! // git-submodule-yolov5-branch=master
//! // git-submodule-yolov5-hash=6e04b94fa9fb12ff66b2329660de8a5a8e5f1b1d
//! // git-submodule-yolov5-origin=https://github.com/ultralytics/yolov5
//! ```

pub mod core;
pub mod git;
pub mod tags;

pub use tags::{
    extract_tags, extract_tags_from, extract_tags_in, ExtractError, RepoSource, TagMapping,
    TagOptions,
};
