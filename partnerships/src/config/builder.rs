//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use std::path::Path;

/// Builder for creating [`PartnershipsConfig`] instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: PartnershipsConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: PartnershipsConfig::default(),
        }
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace the alert toggles.
    pub fn with_notification_settings(mut self, settings: NotificationSettings) -> Self {
        self.config.notifications = settings;
        self
    }

    /// Disable every remote-event alert.
    pub fn without_alerts(mut self) -> Self {
        self.config.notifications = NotificationSettings::silent();
        self
    }

    /// Choose whether opening a second session cancels the first.
    pub fn with_implicit_cancel_on_switch(mut self, enabled: bool) -> Self {
        self.config.session.implicit_cancel_on_switch = enabled;
        self
    }

    /// Set the timeout for hooks that do not declare their own.
    pub fn with_hook_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.hooks.default_timeout_ms = timeout_ms;
        self
    }

    /// Debug-level compact logging.
    pub fn development() -> Self {
        Self::new()
            .with_log_level(LogLevel::Debug)
            .with_log_format(LogFormat::Compact)
    }

    /// Quiet configuration for automated tests: no alerts, short hook timeouts.
    pub fn testing() -> Self {
        Self::new()
            .with_log_level(LogLevel::Warn)
            .without_alerts()
            .with_hook_timeout_ms(250)
    }

    /// Info-level JSON logging.
    pub fn production() -> Self {
        Self::new()
            .with_log_level(LogLevel::Info)
            .with_log_format(LogFormat::Json)
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<PartnershipsConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
