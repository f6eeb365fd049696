//! Utility modules.
//!
//! # Modules
//!
//! - [`paths`]: Path resolution helpers (tilde expansion)

pub mod paths;
