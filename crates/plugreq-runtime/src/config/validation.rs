//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, PlugreqConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &PlugreqConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.output = \"file\" requires logging.file_path",
        ));
    }

    if let Some(path) = &logging.file_path
        && path.file_name().is_none()
    {
        return Err(ConfigError::validation(format!(
            "logging.file_path must name a file: {}",
            path.display()
        )));
    }

    for module in logging.filters.keys() {
        if module.trim().is_empty() {
            return Err(ConfigError::validation(
                "logging.filters keys must be non-empty module paths",
            ));
        }
        if module.contains(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid logging filter module: '{module}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::schema::LogLevel;

    #[test]
    fn test_validate_default_config() {
        let config = PlugreqConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = PlugreqConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));

        config.logging.file_path = Some(PathBuf::from("logs/plugreq.log"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_file_path_must_name_file() {
        let mut config = PlugreqConfig::default();
        config.logging.file_path = Some(PathBuf::from("/"));
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_filter_keys_checked() {
        let mut config = PlugreqConfig::default();
        config
            .logging
            .filters
            .insert("plugreq_core".to_string(), LogLevel::Trace);
        assert!(validate_config(&config).is_ok());

        config
            .logging
            .filters
            .insert("bad module".to_string(), LogLevel::Debug);
        assert!(validate_config(&config).is_err());
    }
}
