//! Argon2id password hashing.
//!
//! Configured secrets are PHC strings (`$argon2id$v=19$m=...`). The salt
//! and cost parameters travel inside the string, so verification needs no
//! other input. The final digest comparison is constant-time.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use journal_core::{Error, Result};

/// Hash `password` with the default Argon2id cost parameters.
pub fn hash_password(password: &str) -> Result<String> {
    hash_password_with(password, Params::default())
}

/// Hash `password` with explicit cost parameters.
pub fn hash_password_with(password: &str, params: Params) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::config(format!("Failed to hash password: {e}")))
}

/// Parse a configured PHC hash string.
///
/// `label` names the secret in the error message; the hash itself is
/// never echoed.
pub fn parse_hash<'a>(hash: &'a str, label: &str) -> Result<PasswordHash<'a>> {
    PasswordHash::new(hash.trim())
        .map_err(|e| Error::config(format!("{label} password hash is not a valid PHC string: {e}")))
}

/// Whether `password` matches the parsed hash.
pub fn verify(password: &str, hash: &PasswordHash<'_>) -> bool {
    Argon2::default()
        .verify_password(password.as_bytes(), hash)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::cheap_params;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with("correct horse", cheap_params()).unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = parse_hash(&hash, "admin").unwrap();
        assert!(verify("correct horse", &parsed));
        assert!(!verify("correct horse ", &parsed));
        assert!(!verify("", &parsed));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password_with("same", cheap_params()).unwrap();
        let b = hash_password_with("same", cheap_params()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_rejects_plaintext() {
        let err = parse_hash("hunter2", "viewer").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("viewer"));
        assert!(!err.to_string().contains("hunter2"));
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let hash = hash_password_with("pw", cheap_params()).unwrap();
        let padded = format!("  {hash}\n");
        let parsed = parse_hash(&padded, "admin").unwrap();
        assert!(verify("pw", &parsed));
    }
}
