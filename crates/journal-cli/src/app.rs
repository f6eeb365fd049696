//! The `journal` application.
//!
//! [`JournalCli`] owns the loaded configuration and dispatches parsed
//! [`CliArgs`] to the server, the health probe, and the config handlers.

use std::future::Future;
use std::io::BufRead;
use std::sync::Arc;

use journal_api::AppState;
use journal_auth::AuthGate;
use journal_core::traits::ConfigProvider;
use journal_core::{Error, Result, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::cli::{BaseCommand, CliArgs};
use crate::config::JournalConfig;
use crate::config_handlers;

// ============================================================================
// JournalCli
// ============================================================================

/// CLI application parameterized over a config provider.
pub struct JournalCli<C: ConfigProvider> {
    name: String,
    config: Arc<C>,
    version: String,
}

impl JournalCli<JournalConfig> {
    /// Create from CLI args, loading config from file and environment.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = JournalConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }
}

impl<C: ConfigProvider> JournalCli<C> {
    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: C) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Get a reference to the config provider.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// `RUST_LOG` wins over the verbosity flags. `log` records from the
    /// library crates reach the same subscriber through its `log` bridge.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info,sqlx=warn")
        };

        // Logs go to stderr so stdout stays clean for `hash-password`.
        // A subscriber may already be set (tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(BaseCommand::Serve { host, port }) => {
                self.serve(host, port, journal_api::shutdown_signal()).await
            }
            Some(BaseCommand::Health) => self.health().await,
            Some(BaseCommand::HashPassword { password }) => {
                let password = match password {
                    Some(p) => p,
                    None => read_password_line(std::io::stdin().lock())?,
                };
                println!("{}", hash_secret(&password)?);
                Ok(())
            }
            Some(BaseCommand::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(BaseCommand::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {}: use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    /// Open storage and wire the handler state.
    pub async fn app_state(&self) -> Result<AppState> {
        let store = journal_storage::open(self.config.storage()).await?;
        log::info!("Opened {} entry store", store.name());
        Ok(AppState::new(self.config.auth(), store))
    }

    /// Bind and serve until `shutdown` resolves.
    ///
    /// `host` and `port` override the configured listener.
    pub async fn serve<F>(&self, host: Option<String>, port: Option<u16>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let server = self.listener_config(host, port);
        let state = self.app_state().await?;
        let app = journal_api::router(state, &server.prefix);

        let addr = server.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::config(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!(
            project = self.config.project_name(),
            prefix = %server.prefix,
            "Starting {} {}",
            self.name,
            self.version
        );
        journal_api::serve(listener, app, shutdown).await?;
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Verify secrets parse and storage opens.
    async fn health(&self) -> Result<()> {
        AuthGate::new(self.config.auth()).check()?;
        let store = journal_storage::open(self.config.storage()).await?;
        println!("{}: healthy ({} storage)", self.name, store.name());
        Ok(())
    }

    fn listener_config(&self, host: Option<String>, port: Option<u16>) -> ServerConfig {
        let mut server = self.config.server().clone();
        if let Some(host) = host {
            server.host = host;
        }
        if let Some(port) = port {
            server.port = port;
        }
        server
    }
}

// ============================================================================
// hash-password
// ============================================================================

fn read_password_line(mut input: impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn hash_secret(password: &str) -> Result<String> {
    if password.is_empty() {
        return Err(Error::validation("Password must not be empty"));
    }
    journal_auth::hash_password(password)
}

// ============================================================================
// Tests
// ============================================================================
