//! Configuration settings structures for slackboard
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig, RotationConfig};
use crate::models::TagBinding;
use crate::services::relay::SyncFailurePolicy;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "slackboard".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    29800
}

fn default_keep_alive_timeout() -> u64 {
    75
}

fn default_slack_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/slackboard.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_max_files() -> usize {
    5
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds in-flight requests may keep running after a shutdown signal
    #[serde(default = "default_keep_alive_timeout")]
    pub keep_alive_timeout: u64,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            keep_alive_timeout: default_keep_alive_timeout(),
        }
    }
}

// ============================================================================
// Slack Configuration
// ============================================================================

/// Outbound webhook shared by every delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Incoming-webhook URL every message is posted to
    #[serde(default)]
    pub webhook_url: String,

    /// Transport timeout of a single post, in seconds
    #[serde(default = "default_slack_timeout")]
    pub timeout: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            timeout: default_slack_timeout(),
        }
    }
}

// ============================================================================
// Relay Configuration
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// What a synchronous fan-out does after one delivery fails
    #[serde(default)]
    pub sync_failure_policy: SyncFailurePolicy,
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// Rotation settings for file logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSettings {
    /// Maximum file size in bytes before rotation
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Maximum number of rotated files to keep
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            max_files: default_max_files(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub rotation: RotationSettings,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
            rotation: RotationSettings::default(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let format: LogFormat = self.file.format.parse().map_err(|e: anyhow::Error| {
            ConfigError::validation("logger.file.format".to_string(), e.to_string())
        })?;

        Ok(LoggerConfig {
            console: ConsoleConfig {
                enabled: self.console.enabled,
                colored: self.console.colored,
            },
            file: FileConfig {
                enabled: self.file.enabled,
                path: PathBuf::from(self.file.path),
                append: self.file.append,
                format,
                rotation: RotationConfig {
                    max_size: self.file.rotation.max_size,
                    max_files: self.file.rotation.max_files,
                },
            },
            level: self.level,
        })
    }
}

// ============================================================================
// Root Settings
// ============================================================================

/// Root configuration snapshot, built once at startup and never mutated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub slack: SlackConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    /// Tag bindings in file order; a tag may appear more than once
    #[serde(default)]
    pub tags: Vec<TagBinding>,

    #[serde(default)]
    pub logger: LoggerSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address() {
        let server = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(server.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.application.name, "slackboard");
        assert_eq!(settings.server.port, 29800);
        assert_eq!(settings.slack.timeout, 30);
        assert_eq!(settings.relay.sync_failure_policy, SyncFailurePolicy::AttemptAll);
        assert!(settings.tags.is_empty());
    }

    #[test]
    fn test_deserialize_tags_from_toml() {
        let raw = r##"
[slack]
webhook_url = "https://hooks.slack.com/services/T/B/X"

[relay]
sync_failure_policy = "short_circuit"

[[tags]]
tag = "deploy"
channel = "#deploy"
username = "deploy-bot"
icon_emoji = ":rocket:"

[[tags]]
tag = "deploy"
channel = "#ops"
parse = "full"
"##;
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.relay.sync_failure_policy, SyncFailurePolicy::ShortCircuit);
        assert_eq!(settings.tags.len(), 2);
        assert_eq!(settings.tags[0].channel, "#deploy");
        assert_eq!(settings.tags[0].username.as_deref(), Some("deploy-bot"));
        assert_eq!(settings.tags[1].parse.as_deref(), Some("full"));
        assert_eq!(settings.tags[1].icon_emoji, None);
    }

    #[test]
    fn test_into_logger_config() {
        let settings = LoggerSettings {
            level: "debug".to_string(),
            file: FileSettings {
                enabled: true,
                format: "compact".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let config = settings.into_logger_config().unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.file.enabled);
        assert_eq!(config.file.format, LogFormat::Compact);
        assert_eq!(config.file.path, PathBuf::from("logs/slackboard.log"));
    }

    #[test]
    fn test_into_logger_config_rejects_unknown_format() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "yaml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(settings.into_logger_config().is_err());
    }
}
