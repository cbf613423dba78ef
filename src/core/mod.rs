//! core
//!
//! Core domain types for repotags.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Oid
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Values are validated once, at construction, and coerced to plain
//!   strings only at the output boundary

pub mod types;
