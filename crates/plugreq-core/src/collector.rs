//! The plugin request collector.
//!
//! A [`PluginRequestCollector`] is the delegate of one plugins block (or of
//! several block evaluations that share it).  The host obtains a declaration
//! entry point with [`create_spec`](PluginRequestCollector::create_spec), the
//! block body calls `id(...)` on it, and the host finalizes with
//! [`plugin_requests`](PluginRequestCollector::plugin_requests).
//!
//! ```text
//! host ──create_spec(line)──▶ PluginDependenciesSpec ──id(..)──▶ PluginDependencySpec
//!   │                                   │                         (version / apply)
//!   │                                   └── registers RequestBuilder ──┐
//!   └──plugin_requests()──▶ duplicate check ◀───── ordered builders ◀──┘
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::builder::{BuilderHandle, DependencySpec, RequestBuilder, Restricted};
use crate::error::{Location, PluginRequestError, PluginRequestResult};
use crate::id::PluginId;
use crate::request::{PluginRequest, PluginRequests};
use crate::script::ScriptSource;

// ─── AllowApplyFalse ──────────────────────────────────────────────────────────

/// Whether declarations may opt out of automatic application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowApplyFalse {
    /// `apply(false)` is accepted.
    #[default]
    Allowed,
    /// `apply(false)` fails with `ApplyFalseForbidden` (restricted mode).
    Forbidden,
}

// ─── PluginRequestCollector ───────────────────────────────────────────────────

/// Owns the ordered builders of a plugins block and finalizes them.
///
/// The collector is confined to the thread evaluating its script; the entry
/// point returned by [`create_spec`](Self::create_spec) borrows it mutably, so
/// declarations cannot interleave with finalization.
#[derive(Debug)]
pub struct PluginRequestCollector {
    script_source: Arc<dyn ScriptSource>,
    allow_apply_false: AllowApplyFalse,
    specs: Vec<RequestBuilder>,
}

impl PluginRequestCollector {
    /// Creates an empty collector for `script_source`.
    pub fn new(script_source: Arc<dyn ScriptSource>, allow_apply_false: AllowApplyFalse) -> Self {
        Self {
            script_source,
            allow_apply_false,
            specs: Vec::new(),
        }
    }

    /// The script requests are attributed to.
    pub fn script_source(&self) -> &Arc<dyn ScriptSource> {
        &self.script_source
    }

    pub fn allow_apply_false(&self) -> AllowApplyFalse {
        self.allow_apply_false
    }

    /// Registered builders in declaration order.
    pub fn builders(&self) -> &[RequestBuilder] {
        &self.specs
    }

    /// Returns a declaration entry point for a block starting at `block_line_number`.
    pub fn create_spec(&mut self, block_line_number: u32) -> PluginDependenciesSpec<'_> {
        PluginDependenciesSpec {
            collector: self,
            block_line_number,
        }
    }

    /// Finalizes the current builders into a duplicate-free request sequence.
    ///
    /// Each call re-derives the result from builder state; nothing is cached.
    /// Use [`into_plugin_requests`](Self::into_plugin_requests) to seal the
    /// collector instead.
    pub fn plugin_requests(&self) -> PluginRequestResult<PluginRequests> {
        if self.specs.is_empty() {
            return Ok(PluginRequests::empty());
        }
        self.list_plugin_requests().map(PluginRequests::from_vec)
    }

    /// Finalizes and consumes the collector, so no declaration can follow.
    pub fn into_plugin_requests(self) -> PluginRequestResult<PluginRequests> {
        self.plugin_requests()
    }

    fn list_plugin_requests(&self) -> PluginRequestResult<Vec<PluginRequest>> {
        let requests: Vec<PluginRequest> = self
            .specs
            .iter()
            .map(|spec| spec.to_request(&self.script_source))
            .collect();

        check_duplicates(&requests)?;

        debug!(
            script = %self.script_source.display_name(),
            count = requests.len(),
            "Finalized plugin requests"
        );
        Ok(requests)
    }

    /// Appends `builder` and returns the registered value.
    fn register(&mut self, builder: RequestBuilder) -> &mut RequestBuilder {
        let index = self.specs.len();
        self.specs.push(builder);
        &mut self.specs[index]
    }
}

/// Scans `requests` in declaration order and fails at the first repeated id.
fn check_duplicates(requests: &[PluginRequest]) -> PluginRequestResult<()> {
    let mut first_seen: HashMap<&PluginId, &PluginRequest> = HashMap::with_capacity(requests.len());

    for request in requests {
        match first_seen.entry(request.id()) {
            Entry::Occupied(first) => {
                let first = first.get();
                debug!(
                    plugin = %request.id(),
                    first_line = first.line_number(),
                    line = request.line_number(),
                    "Duplicate plugin request"
                );
                return Err(PluginRequestError::DuplicateRequest {
                    id: request.id().clone(),
                    first_line: first.line_number(),
                    location: Location::new(request.script_display_name(), request.line_number()),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(request);
            }
        }
    }

    Ok(())
}

// ─── PluginDependenciesSpec ───────────────────────────────────────────────────

/// The declaration entry point of one block evaluation.
#[derive(Debug)]
pub struct PluginDependenciesSpec<'a> {
    collector: &'a mut PluginRequestCollector,
    block_line_number: u32,
}

impl PluginDependenciesSpec<'_> {
    /// Line of the block this entry point was created for.
    pub fn block_line_number(&self) -> u32 {
        self.block_line_number
    }

    /// Declares a plugin at the block's own line.
    pub fn id<'s>(
        &mut self,
        id: impl Into<Option<&'s str>>,
    ) -> PluginRequestResult<PluginDependencySpec<'_>> {
        let line_number = self.block_line_number;
        self.id_at(id, line_number)
    }

    /// Declares a plugin at an explicit line.
    ///
    /// The builder is registered before any later `version`/`apply` call can
    /// fail, so a failing chain still leaves its entry in the collector.
    pub fn id_at<'s>(
        &mut self,
        id: impl Into<Option<&'s str>>,
        line_number: u32,
    ) -> PluginRequestResult<PluginDependencySpec<'_>> {
        let builder = RequestBuilder::new(id, line_number)?;
        trace!(plugin = %builder.id(), line = line_number, "Registered plugin declaration");

        let allow_apply_false = self.collector.allow_apply_false;
        let handle = BuilderHandle::new(self.collector.register(builder));

        Ok(match allow_apply_false {
            AllowApplyFalse::Allowed => PluginDependencySpec::Permissive(handle),
            AllowApplyFalse::Forbidden => PluginDependencySpec::Restricted(Restricted::new(handle)),
        })
    }
}

// ─── PluginDependencySpec ─────────────────────────────────────────────────────

/// Handle returned by `id(...)`; permissive or restricted depending on the collector.
#[derive(Debug)]
pub enum PluginDependencySpec<'a> {
    Permissive(BuilderHandle<'a>),
    Restricted(Restricted<BuilderHandle<'a>>),
}

impl PluginDependencySpec<'_> {
    /// The builder behind this handle.
    pub fn builder(&self) -> &RequestBuilder {
        match self {
            Self::Permissive(handle) => handle.builder(),
            Self::Restricted(restricted) => restricted.inner().builder(),
        }
    }

    /// Returns `true` if `apply(false)` is refused by this handle.
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Restricted(_))
    }
}

impl DependencySpec for PluginDependencySpec<'_> {
    fn version<'s>(self, version: impl Into<Option<&'s str>>) -> PluginRequestResult<Self> {
        match self {
            Self::Permissive(handle) => handle.version(version).map(Self::Permissive),
            Self::Restricted(restricted) => restricted.version(version).map(Self::Restricted),
        }
    }

    fn apply(self, apply: bool) -> PluginRequestResult<Self> {
        match self {
            Self::Permissive(handle) => handle.apply(apply).map(Self::Permissive),
            Self::Restricted(restricted) => restricted.apply(apply).map(Self::Restricted),
        }
    }
}
