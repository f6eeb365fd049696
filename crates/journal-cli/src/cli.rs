//! clap definitions for the `journal` binary.

use clap::{Parser, Subcommand};

// ============================================================================
// Arguments
// ============================================================================

/// Top-level arguments of the `journal` binary.
#[derive(Parser, Debug)]
#[command(name = "journal", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Config file to read instead of `~/.config/journal/config.toml`.
    #[arg(short, long, env = "JOURNAL_CONFIG")]
    pub config: Option<String>,

    /// Log at debug level.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Log warnings and errors only.
    #[arg(short, long)]
    pub quiet: bool,

    /// Prints a usage hint when omitted.
    #[command(subcommand)]
    pub command: Option<BaseCommand>,
}

/// Commands of the `journal` binary.
#[derive(Subcommand, Debug)]
pub enum BaseCommand {
    /// Run the HTTP API server.
    Serve {
        /// Address to bind (overrides `server.host`).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check that secrets are configured and storage opens.
    Health,

    /// Print an Argon2id hash suitable for `auth.*_password_hash`.
    HashPassword {
        /// Password to hash; read from stdin when omitted.
        password: Option<String>,
    },

    /// Print version information.
    Version,

    /// Inspect or edit the config file.
    Config(ConfigCommand),
}

/// `journal config <action>`.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// What to do with the config file.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Operations on the `journal` config file.
///
/// Keys are dotted TOML paths into the `[server]`, `[auth]` and
/// `[storage]` sections, plus the top-level `project_name`.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print which file `journal` reads, even if it does not exist yet.
    Path,

    /// Print the effective value of a key, environment overlays included.
    Get {
        /// For example `server.port` or `storage.url`.
        key: String,
    },

    /// Write a key into the config file.
    ///
    /// The edited file must still load as a journal config; a value of the
    /// wrong type (say, a word for `server.port`) leaves the file unchanged.
    Set {
        /// For example `auth.admin_password_hash`.
        key: String,

        /// `true`/`false` and numbers are stored typed, anything else as a string.
        value: String,
    },

    /// Write a config file holding the defaults (no password hashes).
    Init {
        /// Where to write it instead of `~/.config/journal/config.toml`.
        #[arg(short, long)]
        file: Option<String>,

        /// Replace a file that is already there.
        #[arg(long)]
        force: bool,
    },

    /// Print the effective config as `JOURNAL_*` variables.
    Export {
        /// Prefix each line with `--env` for `docker run`.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
