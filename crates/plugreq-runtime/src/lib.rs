//! Plugreq Runtime - host side of plugin request collection.
//!
//! This crate provides:
//! - Configuration loading (`ConfigLoader`, `PlugreqConfig`)
//! - Logging setup (`LoggingBuilder`, `logging::init_from_config`)
//! - Plugins manifests (`PluginsBlock`, `Declaration`)
//! - Block evaluation with located errors (`BlockHost`)
//! - JSON reports of finalized requests (`RequestReport`)
//!
//! ```ignore
//! use plugreq_runtime::{BlockHost, PluginsBlock, config::load_config, logging};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let block = PluginsBlock::from_file("plugins.toml")?;
//!     let requests = BlockHost::new(&config.collector).evaluate(&block)?;
//!     for request in &requests {
//!         println!("{request}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod manifest;
pub mod report;

// Re-exports
pub use config::{
    CollectorConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig, PlugreqConfig,
};
pub use error::{LocatedError, RuntimeError, RuntimeResult};
pub use host::BlockHost;
pub use logging::LoggingBuilder;
pub use manifest::{Declaration, PluginsBlock};
pub use report::{RequestEntry, RequestReport};

pub use tracing;
pub use tracing_subscriber;
