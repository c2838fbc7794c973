//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Notification relay for a Slack incoming webhook
#[derive(Parser, Debug)]
#[command(name = "slackboard")]
#[command(about = "Notification relay for a Slack incoming webhook")]
#[command(long_about = "
slackboard accepts messages over HTTP and forwards them to a Slack incoming
webhook. Messages sent to /notify are routed by tag to every configured
binding; /notify-directly passes a complete payload through.

EXAMPLES:
    # Start the relay with the layered configuration in ./config
    slackboard serve

    # Start on all interfaces
    slackboard serve --host 0.0.0.0 --port 29800

    # Use a single configuration file
    slackboard --config /etc/slackboard/slackboard.toml serve

    # Check configuration without starting the server
    slackboard serve --dry-run

    # Send stdin to the relay, waiting for delivery
    make 2>&1 | slackboard send --server relay.internal:29800 --tag build --sync
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this TOML file instead of the layered files in ./config.
    /// Environment variable overrides still apply.
    #[arg(
        short,
        long,
        value_name = "FILE",
        value_parser = super::validation::validate_config_file_path
    )]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `config/{environment}.toml` layer is loaded.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the relay server (default)
    ///
    /// Examples:
    ///   slackboard serve                            # Start with defaults
    ///   slackboard serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   slackboard serve --dry-run                  # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Default: 127.0.0.1
        #[arg(
            long,
            value_name = "ADDRESS",
            value_parser = super::validation::validate_host_address
        )]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Default: 29800
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Overrides both the configuration file and --verbose/--quiet.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Send stdin to a running relay
    ///
    /// The message is posted to /notify with the local hostname attached.
    ///
    /// Examples:
    ///   echo done | slackboard send -s localhost:29800 -t deploy
    ///   df -h | slackboard send -s localhost:29800 -t disk --level warn --sync
    Send {
        /// Relay address as HOST[:PORT]
        #[arg(
            short,
            long,
            value_name = "SERVER",
            value_parser = super::validation::validate_server_address
        )]
        server: String,

        /// Tag the message is routed by
        #[arg(short, long, value_name = "TAG", value_parser = super::validation::validate_tag)]
        tag: String,

        /// Wait until the webhook confirmed delivery
        #[arg(long)]
        sync: bool,

        /// Severity; renders the message as a colored attachment
        #[arg(short, long, value_enum)]
        level: Option<Level>,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

/// Message severity accepted by the relay
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Crit,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Crit => "crit",
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
