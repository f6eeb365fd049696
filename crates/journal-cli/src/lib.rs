//! Command-line entry point for the Journal backend.
//!
//! # Key Abstractions
//!
//! - [`JournalCli`]: the application, generic over a [`ConfigProvider`]
//! - [`JournalConfig`]: file and environment backed configuration
//! - [`CliArgs`]: clap definitions for `serve`, `health`, `hash-password`,
//!   `version`, and `config`
//!
//! [`ConfigProvider`]: journal_core::ConfigProvider

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;

pub use app::JournalCli;
pub use cli::{BaseCommand, CliArgs, ConfigAction, ConfigCommand};
pub use config::JournalConfig;
