//! Test helpers: cheap Argon2 parameters and ready-made configs.

#![allow(clippy::expect_used)]

use argon2::Params;
use journal_core::AuthConfig;

use crate::password::hash_password_with;

/// Admin password used by [`test_auth_config`].
pub const ADMIN_PASSWORD: &str = "admin-secret";

/// Viewer password used by [`test_auth_config`].
pub const VIEWER_PASSWORD: &str = "viewer-secret";

/// Minimal Argon2 cost parameters. Never use outside tests.
pub fn cheap_params() -> Params {
    Params::new(8, 1, 1, None).expect("valid argon2 params")
}

/// Hash `password` with [`cheap_params`].
pub fn cheap_hash(password: &str) -> String {
    hash_password_with(password, cheap_params()).expect("hashing succeeds")
}

/// An [`AuthConfig`] whose secrets are [`ADMIN_PASSWORD`] and
/// [`VIEWER_PASSWORD`].
pub fn test_auth_config() -> AuthConfig {
    AuthConfig::with_secrets(cheap_hash(ADMIN_PASSWORD), cheap_hash(VIEWER_PASSWORD))
}
