//! Configuration model definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PartnershipsConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Which remote events raise an operator alert
    pub notifications: NotificationSettings,

    /// Edit session behaviour
    pub session: SessionConfig,

    /// Outbound hook execution
    pub hooks: HookConfig,
}

/// Per-kind toggles for alerts raised by remote events.
///
/// Counters and registry updates happen regardless; these only gate the
/// `Alert` notification sent to hooks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationSettings {
    /// A partner organization asked for a partnership
    pub partnership_request: bool,

    /// A partner answered one of our partnership requests
    pub partnership_response: bool,

    /// A partner closed an approved partnership
    pub partnership_closure: bool,

    /// A partner sent relationship requests for our users
    pub relationship_request: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            partnership_request: true,
            partnership_response: true,
            partnership_closure: true,
            relationship_request: true,
        }
    }
}

impl NotificationSettings {
    /// Every alert disabled
    pub fn silent() -> Self {
        Self {
            partnership_request: false,
            partnership_response: false,
            partnership_closure: false,
            relationship_request: false,
        }
    }
}

/// Edit session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Opening a session on another partnership cancels the open one.
    /// When false, the second `begin_edit` fails instead.
    pub implicit_cancel_on_switch: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            implicit_cancel_on_switch: true,
        }
    }
}

/// Outbound hook configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HookConfig {
    /// Timeout applied to hooks that do not set their own
    pub default_timeout_ms: u64,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 5000,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default format
    Default,

    /// JSON format
    Json,

    /// Compact format
    Compact,

    /// Pretty format
    Pretty,
}
