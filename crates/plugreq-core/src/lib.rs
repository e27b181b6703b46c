//! # Plugreq Core
//!
//! Turns the declarations of a `plugins { }` block into a validated,
//! immutable, duplicate-free sequence of plugin requests.
//!
//! ## Components
//!
//! - **Plugin Request** ([`PluginRequest`], [`PluginRequests`]): the finalized output.
//! - **Request Builder** ([`RequestBuilder`]): in-progress state of one `id(...)` call,
//!   validated eagerly.
//! - **Restricted decorator** ([`Restricted`]): refuses `apply(false)` in restricted mode.
//! - **Request Collector** ([`PluginRequestCollector`]): owns the ordered builders,
//!   exposes the declaration entry point and finalizes.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐ create_spec ┌────────────────────────┐  id(..)  ┌──────────────────────┐
//! │   Host   │────────────▶│ PluginDependenciesSpec │─────────▶│ PluginDependencySpec │
//! └──────────┘             └────────────────────────┘          └──────────────────────┘
//!      │ plugin_requests()                                      version(..) / apply(..)
//!      ▼
//! ┌────────────────┐
//! │ PluginRequests │  (ordered, duplicate-free, immutable)
//! └────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use plugreq_core::{AllowApplyFalse, DependencySpec, NamedScriptSource, PluginRequestCollector};
//!
//! let source = Arc::new(NamedScriptSource::new("build file 'build.script'"));
//! let mut collector = PluginRequestCollector::new(source, AllowApplyFalse::Allowed);
//!
//! let mut spec = collector.create_spec(3);
//! spec.id("org.example.base")?;
//! spec.id("org.example.greeting")?.version("1.2")?.apply(false)?;
//!
//! let requests = collector.plugin_requests()?;
//! assert_eq!(requests.len(), 2);
//! assert_eq!(
//!     requests.get(1).unwrap().to_string(),
//!     "[id: 'org.example.greeting', version: '1.2', apply: false]"
//! );
//! # Ok::<(), plugreq_core::PluginRequestError>(())
//! ```

pub mod builder;
pub mod collector;
pub mod error;
pub mod id;
mod macros;
pub mod request;
pub mod script;

pub use builder::{BuilderHandle, DependencySpec, RequestBuilder, Restricted};
pub use collector::{
    AllowApplyFalse, PluginDependenciesSpec, PluginDependencySpec, PluginRequestCollector,
};
pub use error::{EMPTY_VALUE, ErrorKind, Location, PluginRequestError, PluginRequestResult};
pub use id::PluginId;
pub use request::{PluginRequest, PluginRequests};
pub use script::{NamedScriptSource, ScriptSource};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        AllowApplyFalse, DependencySpec, NamedScriptSource, PluginId, PluginRequest,
        PluginRequestCollector, PluginRequestError, PluginRequests, ScriptSource, plugins,
    };
}
