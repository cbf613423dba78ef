//! tags
//!
//! The tag extractor: turns the current state of a repository into a
//! flat key/value mapping for attachment to an experiment-tracking run.
//!
//! # Key scheme
//!
//! ```text
//! {prefix}-branch / {prefix}-hash / {prefix}-origin
//! {prefix}-submodule-{name}-branch / -hash / -origin
//! ```
//!
//! # Design
//!
//! The extractor core ([`extract_tags_from`]) depends only on the
//! [`RepoSource`] capability trait, not on git2. [`crate::git::Git`]
//! binds that trait to libgit2; tests bind it to an in-memory fake. The
//! convenience entry points [`extract_tags`] and [`extract_tags_in`]
//! resolve a real repository and delegate.

mod extract;
mod source;

pub use extract::{
    extract_tags, extract_tags_from, extract_tags_in, ExtractError, TagMapping, TagOptions,
};
pub use source::RepoSource;
