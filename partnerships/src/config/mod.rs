//! Configuration system for the partnerships engine.
//!
//! Configuration is layered: built-in defaults, then an optional file
//! (TOML, YAML or JSON), then `PARTNERSHIPS_`-prefixed environment
//! variables. The merged result is validated before use.

mod builder;
mod loader;
mod models;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "partnerships.toml",
    "partnerships.yaml",
    "partnerships.yml",
    "partnerships.json",
    ".partnerships/config.toml",
    ".partnerships/config.yaml",
    ".partnerships/config.yml",
    ".partnerships/config.json",
];

/// Environment variable prefix for partnerships configuration
///
/// Nested keys are separated with a double underscore, e.g.
/// `PARTNERSHIPS_LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "PARTNERSHIPS_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
