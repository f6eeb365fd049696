//! Core traits for Journal configuration abstraction.
//!
//! The primary trait is [`ConfigProvider`], which gives the server and the
//! CLI uniform access to the configuration sections without tying them to
//! one loading mechanism.

use crate::config::{AuthConfig, ServerConfig, StorageConfig};

/// Trait for a fully loaded Journal configuration.
///
/// The server and CLI are generic over this trait, so tests can hand them
/// a literal struct while production loads from files and environment.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across threads
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use journal_core::{AuthConfig, ConfigProvider, ServerConfig, StorageConfig};
///
/// #[derive(Clone, Default)]
/// struct StaticConfig {
///     server: ServerConfig,
///     auth: AuthConfig,
///     storage: StorageConfig,
/// }
///
/// impl ConfigProvider for StaticConfig {
///     fn project_name(&self) -> &str {
///         "journal"
///     }
///
///     fn server(&self) -> &ServerConfig {
///         &self.server
///     }
///
///     fn auth(&self) -> &AuthConfig {
///         &self.auth
///     }
///
///     fn storage(&self) -> &StorageConfig {
///         &self.storage
///     }
/// }
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used for env var prefixes and default paths.
    fn project_name(&self) -> &str;

    /// HTTP listener settings.
    fn server(&self) -> &ServerConfig;

    /// Secrets and session settings.
    fn auth(&self) -> &AuthConfig;

    /// Persistence backend settings.
    fn storage(&self) -> &StorageConfig;
}
