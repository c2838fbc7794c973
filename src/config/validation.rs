//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, LoggerSettings, ServerConfig, Settings, SlackConfig,
};
use crate::models::TagBinding;

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Keep-alive timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host must not be empty.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl SlackConfig {
    /// Validate the outbound webhook configuration
    ///
    /// # Validation Rules
    /// - Webhook URL is required and must be an http(s) URL
    /// - Timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook_url.trim().is_empty() {
            return Err(ConfigError::validation(
                "slack.webhook_url",
                "Slack webhook URL is required.",
            ));
        }

        let url = Url::parse(&self.webhook_url).map_err(|e| {
            ConfigError::validation(
                "slack.webhook_url",
                format!("Invalid webhook URL '{}': {}", self.webhook_url, e),
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::validation(
                "slack.webhook_url",
                format!("Unsupported webhook URL scheme '{}'. Use http or https.", url.scheme()),
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "slack.timeout",
                "Slack timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

fn validate_tags(tags: &[TagBinding]) -> Result<(), ConfigError> {
    for (index, binding) in tags.iter().enumerate() {
        if binding.tag.trim().is_empty() {
            return Err(ConfigError::validation(
                format!("tags[{}].tag", index),
                "Tag must not be empty.".to_string(),
            ));
        }

        if binding.channel.trim().is_empty() {
            return Err(ConfigError::validation(
                format!("tags[{}].channel", index),
                format!("Channel is required for tag '{}'.", binding.tag),
            ));
        }
    }

    Ok(())
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        if self.rotation.max_size == 0 || self.rotation.max_files == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation",
                "Rotation max_size and max_files must be greater than 0.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - At least one output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.slack.validate()?;
        validate_tags(&self.tags)?;
        self.logger.validate()?;
        Ok(())
    }
}
