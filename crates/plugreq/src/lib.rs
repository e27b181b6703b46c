//! # Plugreq
//!
//! Collects the plugin requests declared in a `plugins { }` block, validates
//! them as they are declared and finalizes them into an ordered,
//! duplicate-free, immutable sequence.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────┐     ┌─────────────────────────┐     ┌────────────────┐
//! │ PluginsBlock │────▶│ BlockHost │────▶│ PluginRequestCollector  │────▶│ PluginRequests │
//! │  (manifest)  │     │ (config)  │     │ id / version / apply    │     │  (finalized)   │
//! └──────────────┘     └───────────┘     └─────────────────────────┘     └────────────────┘
//! ```
//!
//! - **Core** ([`core`]): builders, the restricted decorator, the collector and the `plugins!` macro
//! - **Runtime** ([`runtime`]): configuration, logging, manifests and the block host
//!
//! ## Quick Start
//!
//! ```rust
//! use plugreq::prelude::*;
//!
//! let block = PluginsBlock::new(NamedScriptSource::new("build file 'build.script'"), 1)
//!     .declare(Declaration::new("org.example.base").at_line(2))
//!     .declare(Declaration::new("org.example.greeting").version("1.2").at_line(3));
//!
//! let requests = BlockHost::new(&CollectorConfig::default()).evaluate(&block)?;
//! assert_eq!(requests.len(), 2);
//! # Ok::<(), plugreq::runtime::RuntimeError>(())
//! ```
//!
//! ## Features
//!
//! - `json-log`: JSON log lines via `tracing-subscriber`

pub use plugreq_core as core;
pub use plugreq_runtime as runtime;

pub use plugreq_core::plugins;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use plugreq::prelude::*;
/// ```
pub mod prelude {
    // Declaring and finalizing requests
    pub use plugreq_core::prelude::*;
    pub use plugreq_core::{Location, PluginDependenciesSpec, PluginDependencySpec};

    // Hosting blocks
    pub use plugreq_runtime::{
        BlockHost, CollectorConfig, ConfigLoader, Declaration, LocatedError, PluginsBlock,
        PlugreqConfig, RequestReport, RuntimeError,
    };
}
