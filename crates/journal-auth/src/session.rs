//! Opaque session tokens.
//!
//! A token carries a role and an absolute expiry, sealed with a keyed
//! BLAKE3 MAC:
//!
//! ```text
//! {role}.{expires_unix_secs}.{mac_hex}
//! ```
//!
//! The MAC key is derived from the two configured password hashes, so
//! rotating either secret invalidates every outstanding session. Decoding
//! is total: malformed, forged, or expired input yields `None`, never an
//! error or a panic.

use std::fmt;

use chrono::{DateTime, Utc};
use journal_core::Role;

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "session";

const KEY_CONTEXT: &str = "journal 2024-01 session token mac";

/// Longest input the decoder will look at.
const MAX_TOKEN_LEN: usize = 256;

/// Decoded session contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken {
    /// Role the session was issued for.
    pub role: Role,
    /// Expiry as Unix seconds.
    pub expires_at: i64,
}

impl SessionToken {
    /// A session for `role` that expires at `expires_at`.
    pub fn new(role: Role, expires_at: DateTime<Utc>) -> Self {
        Self {
            role,
            expires_at: expires_at.timestamp(),
        }
    }

    /// Whether the session is still live at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.expires_at
    }

    fn payload(&self) -> String {
        format!("{}.{}", self.role, self.expires_at)
    }
}

/// Keyed encoder/decoder for [`SessionToken`]s.
#[derive(Clone)]
pub struct SessionCodec {
    key: [u8; 32],
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec {
    /// Codec with an explicit key.
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Derive the MAC key from the two configured password hashes.
    pub fn derive(admin_hash: &str, viewer_hash: &str) -> Self {
        let mut material = Vec::with_capacity(admin_hash.len() + viewer_hash.len() + 1);
        material.extend_from_slice(admin_hash.trim().as_bytes());
        material.push(0);
        material.extend_from_slice(viewer_hash.trim().as_bytes());
        Self::new(blake3::derive_key(KEY_CONTEXT, &material))
    }

    /// Seal `token` into its wire form.
    pub fn encode(&self, token: &SessionToken) -> String {
        let payload = token.payload();
        let mac = blake3::keyed_hash(&self.key, payload.as_bytes());
        format!("{payload}.{}", mac.to_hex())
    }

    /// Open a wire token, rejecting anything forged, malformed, or expired
    /// at `now`.
    pub fn decode(&self, raw: &str, now: DateTime<Utc>) -> Option<SessionToken> {
        if raw.len() > MAX_TOKEN_LEN {
            return None;
        }

        let (payload, mac_hex) = raw.rsplit_once('.')?;
        let mac = blake3::Hash::from_hex(mac_hex).ok()?;
        // blake3::Hash equality is constant-time.
        if blake3::keyed_hash(&self.key, payload.as_bytes()) != mac {
            return None;
        }

        let (role, expires_at) = payload.split_once('.')?;
        let token = SessionToken {
            role: role.parse().ok()?,
            expires_at: expires_at.parse().ok()?,
        };

        token.is_live_at(now).then_some(token)
    }
}
