//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;

/// Upper bound on a hook timeout; anything longer stalls every operation
const MAX_HOOK_TIMEOUT_MS: u64 = 60_000;

/// Validate the entire configuration.
pub fn validate_config(config: &PartnershipsConfig) -> Result<(), ConfigError> {
    validate_logging_config(&config.logging)?;
    validate_hook_config(&config.hooks)?;
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if let Some(file) = &config.file {
        if file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "Log file path cannot be empty".to_string(),
            ));
        }
        if file.file_name().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "Log file path has no file name: {}",
                file.display()
            )));
        }
    }

    if !config.stdout && config.file.is_none() {
        return Err(ConfigError::ValidationError(
            "Logging needs at least one output: enable stdout or set a file".to_string(),
        ));
    }

    Ok(())
}

fn validate_hook_config(config: &HookConfig) -> Result<(), ConfigError> {
    if config.default_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Hook timeout must be greater than zero".to_string(),
        ));
    }
    if config.default_timeout_ms > MAX_HOOK_TIMEOUT_MS {
        return Err(ConfigError::ValidationError(format!(
            "Hook timeout of {}ms exceeds the {}ms maximum",
            config.default_timeout_ms, MAX_HOOK_TIMEOUT_MS
        )));
    }
    Ok(())
}
