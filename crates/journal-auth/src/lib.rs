//! Session and password authentication for the Journal backend.
//!
//! # Key Abstractions
//!
//! - [`AuthGate`]: password → role, role → session token, token → role
//! - [`SessionCodec`]: keyed encode/decode of [`SessionToken`]s
//! - [`password`]: Argon2id hashing helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use journal_auth::AuthGate;
//!
//! let gate = AuthGate::new(&config.auth);
//! if let Some(role) = gate.authenticate("hunter2")? {
//!     let session = gate.issue_session(role)?;
//!     // hand session.token to the transport as an HTTP-only cookie
//! }
//! ```

#![doc = include_str!("../README.md")]

pub mod gate;
pub mod password;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use gate::{AuthGate, IssuedSession};
pub use password::hash_password;
pub use session::{SESSION_COOKIE, SessionCodec, SessionToken};
