//! Configuration sections shared by the server and the CLI.
//!
//! These are plain serde structs. Loading (files, environment) lives in
//! `journal-cli`; everything downstream receives an already-built value.

use std::fmt;

use serde::{Deserialize, Serialize};

mod lenient {
    //! Accept a scalar either natively or as a string. Environment overlays
    //! deliver every value as a string.

    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Value(T),
        Text(String),
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        match Raw::<T>::deserialize(deserializer)? {
            Raw::Value(value) => Ok(value),
            Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
        }
    }
}

/// Default session lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port to listen on.
    #[serde(deserialize_with = "lenient::deserialize")]
    pub port: u16,

    /// Path prefix every route is mounted under.
    pub prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
            prefix: "/api".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Credential and session configuration.
///
/// The two password fields hold Argon2 PHC hash strings, never plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Hash of the admin password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password_hash: Option<String>,

    /// Hash of the viewer password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_password_hash: Option<String>,

    /// Absolute session lifetime in seconds.
    #[serde(deserialize_with = "lenient::deserialize")]
    pub session_ttl_secs: u64,

    /// Mark the session cookie `Secure` (HTTPS only).
    #[serde(deserialize_with = "lenient::deserialize")]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password_hash: None,
            viewer_password_hash: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            cookie_secure: false,
        }
    }
}

impl AuthConfig {
    /// Build a config holding both secret hashes.
    pub fn with_secrets(admin_hash: impl Into<String>, viewer_hash: impl Into<String>) -> Self {
        Self {
            admin_password_hash: Some(admin_hash.into()),
            viewer_password_hash: Some(viewer_hash.into()),
            ..Self::default()
        }
    }

    /// Whether both secrets are present and non-empty.
    pub fn has_secrets(&self) -> bool {
        let present = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.admin_password_hash) && present(&self.viewer_password_hash)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &Option<String>| s.as_ref().map(|_| "<redacted>");
        f.debug_struct("AuthConfig")
            .field("admin_password_hash", &redact(&self.admin_password_hash))
            .field("viewer_password_hash", &redact(&self.viewer_password_hash))
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Persistence backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `memory`, or a `sqlite://` URL.
    pub url: String,

    /// Maximum pooled connections for SQL backends.
    #[serde(deserialize_with = "lenient::deserialize")]
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://journal.db".to_string(),
            max_connections: 5,
        }
    }
}

impl StorageConfig {
    /// In-memory storage.
    pub fn memory() -> Self {
        Self {
            url: "memory".to_string(),
            ..Self::default()
        }
    }
}
