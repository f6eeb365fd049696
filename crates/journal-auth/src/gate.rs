//! The authentication gate.
//!
//! [`AuthGate`] owns the two configured secrets and the session codec
//! derived from them. It never fails to construct: a deployment with
//! missing secrets still starts, and every login answers with a
//! configuration error until the secrets are supplied.

use chrono::{DateTime, Duration, Utc};
use journal_core::{AuthConfig, Error, Result, Role};

use crate::password::{parse_hash, verify};
use crate::session::{SessionCodec, SessionToken};

/// A freshly issued session, ready for the transport to set as a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    /// Role the session grants.
    pub role: Role,
    /// Opaque cookie value.
    pub token: String,
    /// Lifetime the cookie should advertise.
    pub max_age: Duration,
}

// ============================================================================
// Gate
// ============================================================================

#[derive(Debug, Clone)]
struct Secrets {
    admin_hash: String,
    viewer_hash: String,
    codec: SessionCodec,
}

/// Password verification and session issue/resolve.
#[derive(Debug, Clone)]
pub struct AuthGate {
    secrets: Option<Secrets>,
    ttl: Duration,
    cookie_secure: bool,
}

impl AuthGate {
    /// Build a gate from configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let secrets = match (&config.admin_password_hash, &config.viewer_password_hash) {
            (Some(admin), Some(viewer)) if config.has_secrets() => Some(Secrets {
                admin_hash: admin.trim().to_string(),
                viewer_hash: viewer.trim().to_string(),
                codec: SessionCodec::derive(admin, viewer),
            }),
            _ => {
                log::warn!("Admin or viewer password hash is not configured; logins will fail");
                None
            }
        };

        let ttl_secs = i64::try_from(config.session_ttl_secs).unwrap_or(i64::MAX);
        Self {
            secrets,
            ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
            cookie_secure: config.cookie_secure,
        }
    }

    /// Validate that both secrets are present and parse as PHC hashes.
    pub fn check(&self) -> Result<()> {
        let secrets = self.secrets()?;
        parse_hash(&secrets.admin_hash, "admin")?;
        parse_hash(&secrets.viewer_hash, "viewer")?;
        Ok(())
    }

    /// Map a presented password to a role.
    ///
    /// Both secrets are always checked so timing does not reveal which one
    /// matched. If a password matches both, admin wins.
    pub fn authenticate(&self, password: &str) -> Result<Option<Role>> {
        let secrets = self.secrets()?;
        let admin = parse_hash(&secrets.admin_hash, "admin")?;
        let viewer = parse_hash(&secrets.viewer_hash, "viewer")?;

        let is_admin = verify(password, &admin);
        let is_viewer = verify(password, &viewer);

        let role = if is_admin {
            Some(Role::Admin)
        } else if is_viewer {
            Some(Role::Viewer)
        } else {
            None
        };

        match role {
            Some(role) => log::info!("Password accepted for role {role}"),
            None => log::info!("Password rejected"),
        }
        Ok(role)
    }

    /// Issue a session for `role`, expiring one TTL from now.
    pub fn issue_session(&self, role: Role) -> Result<IssuedSession> {
        self.issue_session_at(role, Utc::now())
    }

    /// Issue a session for `role` as of `now`.
    pub fn issue_session_at(&self, role: Role, now: DateTime<Utc>) -> Result<IssuedSession> {
        let secrets = self.secrets()?;
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let token = secrets.codec.encode(&SessionToken::new(role, expires_at));
        Ok(IssuedSession {
            role,
            token,
            max_age: self.ttl,
        })
    }

    /// Resolve a presented cookie value to a role. Total: anything invalid,
    /// forged, or expired is `None`.
    pub fn resolve_session(&self, token: Option<&str>) -> Option<Role> {
        self.resolve_session_at(token, Utc::now())
    }

    /// Resolve a presented cookie value as of `now`.
    pub fn resolve_session_at(&self, token: Option<&str>, now: DateTime<Utc>) -> Option<Role> {
        let secrets = self.secrets.as_ref()?;
        secrets.codec.decode(token?, now).map(|t| t.role)
    }

    /// Configured session lifetime.
    pub fn session_ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether the session cookie should be marked `Secure`.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    fn secrets(&self) -> Result<&Secrets> {
        self.secrets
            .as_ref()
            .ok_or_else(|| Error::config("Authentication secrets are not configured"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{ADMIN_PASSWORD, VIEWER_PASSWORD, cheap_hash, test_auth_config};

    fn gate() -> AuthGate {
        AuthGate::new(&test_auth_config())
    }

    #[test]
    fn test_authenticate_roles() {
        let gate = gate();
        assert_eq!(gate.authenticate(ADMIN_PASSWORD).unwrap(), Some(Role::Admin));
        assert_eq!(gate.authenticate(VIEWER_PASSWORD).unwrap(), Some(Role::Viewer));
        assert_eq!(gate.authenticate("wrong").unwrap(), None);
        assert_eq!(gate.authenticate("").unwrap(), None);
    }

    #[test]
    fn test_shared_password_resolves_to_admin() {
        let config = AuthConfig::with_secrets(cheap_hash("same"), cheap_hash("same"));
        let gate = AuthGate::new(&config);
        assert_eq!(gate.authenticate("same").unwrap(), Some(Role::Admin));
    }

    #[test]
    fn test_missing_secrets_is_config_error() {
        let gate = AuthGate::new(&AuthConfig::default());
        assert!(matches!(gate.authenticate("x"), Err(Error::Config(_))));
        assert!(matches!(gate.issue_session(Role::Admin), Err(Error::Config(_))));
        assert!(gate.check().is_err());
        assert_eq!(gate.resolve_session(Some("admin.1.00")), None);
    }

    #[test]
    fn test_invalid_hash_is_config_error() {
        let config = AuthConfig::with_secrets("plaintext", cheap_hash("v"));
        let gate = AuthGate::new(&config);
        assert!(matches!(gate.authenticate("v"), Err(Error::Config(_))));
        assert!(gate.check().is_err());
    }

    #[test]
    fn test_check_accepts_valid_secrets() {
        gate().check().unwrap();
    }

    #[test]
    fn test_issue_and_resolve() {
        let gate = gate();
        let session = gate.issue_session(Role::Viewer).unwrap();
        assert_eq!(session.role, Role::Viewer);
        assert_eq!(session.max_age, Duration::seconds(86_400));
        assert_eq!(gate.resolve_session(Some(&session.token)), Some(Role::Viewer));
    }

    #[test]
    fn test_session_expires_after_ttl() {
        let mut config = test_auth_config();
        config.session_ttl_secs = 60;
        let gate = AuthGate::new(&config);

        let issued_at = Utc::now();
        let session = gate.issue_session_at(Role::Admin, issued_at).unwrap();
        let token = Some(session.token.as_str());

        assert_eq!(
            gate.resolve_session_at(token, issued_at + Duration::seconds(59)),
            Some(Role::Admin)
        );
        assert_eq!(
            gate.resolve_session_at(token, issued_at + Duration::seconds(61)),
            None
        );
    }

    #[test]
    fn test_resolve_rejects_garbage() {
        let gate = gate();
        assert_eq!(gate.resolve_session(None), None);
        assert_eq!(gate.resolve_session(Some("")), None);
        assert_eq!(gate.resolve_session(Some("role=admin")), None);
        assert_eq!(gate.resolve_session(Some("admin")), None);
    }

    #[test]
    fn test_sessions_do_not_cross_deployments() {
        let session = gate().issue_session(Role::Admin).unwrap();
        let other = gate();
        assert_eq!(other.resolve_session(Some(&session.token)), None);
    }

    #[test]
    fn test_cookie_settings() {
        let mut config = test_auth_config();
        config.cookie_secure = true;
        let gate = AuthGate::new(&config);
        assert!(gate.cookie_secure());
        assert_eq!(gate.session_ttl(), Duration::days(1));
    }
}
