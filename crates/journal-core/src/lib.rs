//! Journal Core: shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all Journal crates.
//! It has no internal Journal dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`config`]: Configuration sections (server, auth, storage)
//! - [`entry`]: The `Entry` record, its creation payload and partial patch
//! - [`error`]: Error types and Result alias
//! - [`query`]: Scoped entry filter shared by every store backend
//! - [`role`]: The two fixed roles and the read scope derived from them
//! - [`traits`]: Core traits for configuration abstraction
//! - [`util`]: Path helpers

#![doc = include_str!("../README.md")]

pub mod config;
pub mod entry;
pub mod error;
pub mod query;
pub mod role;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use config::{AuthConfig, ServerConfig, StorageConfig};
pub use entry::{Entry, EntryPatch, NewEntry, timestamp_now};
pub use error::{Error, Result};
pub use query::{ALL_CATEGORIES, DEFAULT_LIMIT, EntryQuery, UNCATEGORIZED};
pub use role::{Role, Scope};
pub use traits::ConfigProvider;

// Convenience re-exports from util
pub use util::paths::expand_tilde;
