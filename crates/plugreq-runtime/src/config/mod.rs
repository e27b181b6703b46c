//! Configuration module for the plugreq runtime.
//!
//! TOML-based configuration for the block host and for logging, layered
//! with `PLUGREQ_*` environment variables.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{CollectorConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, PlugreqConfig};
pub use validation::validate_config;
