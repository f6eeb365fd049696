//! Configuration for the `journal` binary.
//!
//! Provides the [`JournalConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `JOURNAL_CONFIG` environment variable
//! 3. XDG default: `~/.config/journal/config.toml`
//! 4. Built-in defaults
//!
//! `JOURNAL_<SECTION>_<KEY>` variables overlay whatever the file says.

use std::path::PathBuf;

use confyg::{Confygery, env};
use journal_core::{AuthConfig, ConfigProvider, Error, Result, ServerConfig, StorageConfig};
use serde::{Deserialize, Serialize};

/// Environment prefix for overlays and the config path variable.
pub const ENV_PREFIX: &str = "JOURNAL";

const SECTIONS: [&str; 3] = ["server", "auth", "storage"];

// ============================================================================
// Configuration struct
// ============================================================================

/// Complete configuration of a Journal deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Project name, used in log lines and default paths.
    pub project_name: String,

    /// HTTP listener.
    pub server: ServerConfig,

    /// Secrets and sessions.
    pub auth: AuthConfig,

    /// Entry persistence.
    pub storage: StorageConfig,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            project_name: "journal".to_string(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl JournalConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level(ENV_PREFIX);
        for section in SECTIONS {
            env_opts.add_section(section);
        }
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var(format!("{ENV_PREFIX}_CONFIG")) {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("journal").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into `JOURNAL_*` environment variable pairs.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, ENV_PREFIX, &mut vars);
        Ok(vars)
    }
}

impl ConfigProvider for JournalConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn server(&self) -> &ServerConfig {
        &self.server
    }

    fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    fn storage(&self) -> &StorageConfig {
        &self.storage
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// RAII guard for env var manipulation in tests.
    pub(crate) struct EnvGuard {
        key: String,
        prev: Option<String>,
    }

    impl EnvGuard {
        pub(crate) fn new(key: &str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: tests touching a given variable do not run concurrently
            // with readers of that variable.
            unsafe { std::env::set_var(key, value) };
            Self {
                key: key.to_string(),
                prev,
            }
        }

        pub(crate) fn remove(key: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: as above.
            unsafe { std::env::remove_var(key) };
            Self {
                key: key.to_string(),
                prev,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: as above.
            unsafe {
                match &self.prev {
                    Some(val) => std::env::set_var(&self.key, val),
                    None => std::env::remove_var(&self.key),
                }
            }
        }
    }

    pub(crate) fn write_config(dir: &tempfile::TempDir, body: &str) -> String {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_journal_config_default() {
        let config = JournalConfig::default();
        assert_eq!(config.project_name, "journal");
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.server.prefix, "/api");
        assert!(!config.auth.has_secrets());
        assert_eq!(config.storage.url, "sqlite://journal.db");
    }

    #[test]
    fn test_journal_config_from_toml() {
        let config: JournalConfig = toml::from_str(
            r#"
                project_name = "my-journal"

                [server]
                host = "0.0.0.0"
                port = 8080

                [auth]
                admin_password_hash = "$argon2id$a"
                viewer_password_hash = "$argon2id$v"
                cookie_secure = true

                [storage]
                url = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.project_name, "my-journal");
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert!(config.auth.has_secrets());
        assert!(config.auth.cookie_secure);
        assert_eq!(config.auth.session_ttl_secs, 86_400);
        assert_eq!(config.storage.url, "memory");
    }

    #[test]
    fn test_journal_config_toml_round_trip() {
        let config = JournalConfig {
            auth: AuthConfig::with_secrets("$argon2id$a", "$argon2id$v"),
            ..JournalConfig::default()
        };
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("port = 8001"));

        let parsed: JournalConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_journal_config_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
                project_name = "loaded"
                [server]
                port = 9090
            "#,
        );

        let config = JournalConfig::load(Some(&path)).unwrap();
        assert_eq!(config.project_name, "loaded");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_journal_config_load_missing_file_uses_defaults() {
        let config = JournalConfig::load(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.project_name, "journal");
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn test_journal_config_load_env_overlay() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
                [storage]
                url = "sqlite://file.db"
            "#,
        );

        let _guard = EnvGuard::new("JOURNAL_STORAGE_URL", "memory");
        let config = JournalConfig::load(Some(&path)).unwrap();
        assert_eq!(config.storage.url, "memory");
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = JournalConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/config.toml")));
    }

    #[test]
    fn test_resolve_config_path_env_then_default() {
        {
            let _guard = EnvGuard::new("JOURNAL_CONFIG", "/env/config.toml");
            let path = JournalConfig::resolve_config_path(None);
            assert_eq!(path, Some(PathBuf::from("/env/config.toml")));
        }

        let _guard = EnvGuard::remove("JOURNAL_CONFIG");
        let path = JournalConfig::resolve_config_path(None).unwrap();
        assert!(path.ends_with("journal/config.toml"));
    }

    #[test]
    fn test_to_env_vars() {
        let vars: HashMap<_, _> = JournalConfig::default()
            .to_env_vars()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(vars["JOURNAL_PROJECT_NAME"], "journal");
        assert_eq!(vars["JOURNAL_SERVER_PORT"], "8001");
        assert_eq!(vars["JOURNAL_SERVER_PREFIX"], "/api");
        assert_eq!(vars["JOURNAL_AUTH_SESSION_TTL_SECS"], "86400");
        assert_eq!(vars["JOURNAL_STORAGE_URL"], "sqlite://journal.db");
        assert!(!vars.contains_key("JOURNAL_AUTH_ADMIN_PASSWORD_HASH"));
    }

    #[test]
    fn test_config_provider_impl() {
        let config = JournalConfig {
            storage: StorageConfig::memory(),
            ..JournalConfig::default()
        };
        assert_eq!(config.project_name(), "journal");
        assert_eq!(config.storage().url, "memory");
        assert_eq!(config.server().port, 8001);
    }
}
