//! Request builders and the restriction decorator.
//!
//! # Architecture
//!
//! Each `id(...)` declaration produces one [`RequestBuilder`], owned by the
//! collector.  The declaring script only ever sees a handle onto it:
//!
//! - [`BuilderHandle`] — mutable access to a registered builder, permissive.
//! - [`Restricted<S>`] — wraps any [`DependencySpec`] and refuses `apply(false)`.
//!
//! Both implement [`DependencySpec`], the `version`/`apply` contract.  Calls
//! consume the handle and hand it back, so chaining reads like the block it
//! came from:
//!
//! ```rust,ignore
//! spec.id("org.example.greeting")?.version("1.2")?.apply(false)?;
//! ```

use crate::error::{EMPTY_VALUE, PluginRequestError, PluginRequestResult};
use crate::id::PluginId;
use crate::request::PluginRequest;
use crate::script::ScriptSource;

use std::sync::Arc;

// ─── DependencySpec ───────────────────────────────────────────────────────────

/// The chaining contract shared by every request handle.
pub trait DependencySpec: Sized {
    /// Sets the requested version. Fails with `InvalidPluginVersion` on a
    /// missing or empty value; the last successful call wins.
    fn version<'s>(self, version: impl Into<Option<&'s str>>) -> PluginRequestResult<Self>;

    /// Sets whether the plugin is applied automatically.
    fn apply(self, apply: bool) -> PluginRequestResult<Self>;
}

// ─── RequestBuilder ───────────────────────────────────────────────────────────

/// Mutable, in-progress state for one plugin declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    id: PluginId,
    version: Option<String>,
    apply: bool,
    line_number: u32,
}

impl RequestBuilder {
    /// Creates a builder for `id` declared at `line_number`.
    ///
    /// Fails with `InvalidPluginId` when `id` is missing or empty.
    pub fn new<'s>(id: impl Into<Option<&'s str>>, line_number: u32) -> PluginRequestResult<Self> {
        let id = match id.into() {
            Some(value) if !value.is_empty() => PluginId::of(value)?,
            other => return Err(PluginRequestError::invalid_id(other, EMPTY_VALUE)),
        };

        Ok(Self {
            id,
            version: None,
            apply: true,
            line_number,
        })
    }

    /// Overwrites the version after checking it is present and non-empty.
    pub fn set_version<'s>(
        &mut self,
        version: impl Into<Option<&'s str>>,
    ) -> PluginRequestResult<&mut Self> {
        match version.into() {
            Some(value) if !value.is_empty() => {
                self.version = Some(value.to_owned());
                Ok(self)
            }
            other => Err(PluginRequestError::invalid_version(other, EMPTY_VALUE)),
        }
    }

    /// Overwrites the apply flag.
    pub fn set_apply(&mut self, apply: bool) -> &mut Self {
        self.apply = apply;
        self
    }

    pub fn id(&self) -> &PluginId {
        &self.id
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn apply(&self) -> bool {
        self.apply
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// Snapshots the current state as an immutable request.
    pub(crate) fn to_request(&self, script_source: &Arc<dyn ScriptSource>) -> PluginRequest {
        PluginRequest::new(
            self.id.clone(),
            self.version.clone(),
            self.apply,
            self.line_number,
            Arc::clone(script_source),
        )
    }
}

// ─── BuilderHandle ────────────────────────────────────────────────────────────

/// Permissive handle onto a builder registered with a collector.
#[derive(Debug)]
pub struct BuilderHandle<'a> {
    builder: &'a mut RequestBuilder,
}

impl<'a> BuilderHandle<'a> {
    pub(crate) fn new(builder: &'a mut RequestBuilder) -> Self {
        Self { builder }
    }

    /// The builder this handle mutates.
    pub fn builder(&self) -> &RequestBuilder {
        self.builder
    }
}

impl DependencySpec for BuilderHandle<'_> {
    fn version<'s>(self, version: impl Into<Option<&'s str>>) -> PluginRequestResult<Self> {
        self.builder.set_version(version)?;
        Ok(self)
    }

    fn apply(self, apply: bool) -> PluginRequestResult<Self> {
        self.builder.set_apply(apply);
        Ok(self)
    }
}

// ─── Restricted ───────────────────────────────────────────────────────────────

/// Decorator that forbids opting out of automatic application.
///
/// `apply(false)` fails with `ApplyFalseForbidden` before the wrapped spec is
/// touched.  Every other call is delegated and the result re-wrapped, so the
/// restriction holds however long the chain gets.
#[derive(Debug)]
pub struct Restricted<S> {
    decorated: S,
}

impl<S: DependencySpec> Restricted<S> {
    pub fn new(decorated: S) -> Self {
        Self { decorated }
    }

    /// The wrapped spec.
    pub fn inner(&self) -> &S {
        &self.decorated
    }
}

impl<S: DependencySpec> DependencySpec for Restricted<S> {
    fn version<'s>(self, version: impl Into<Option<&'s str>>) -> PluginRequestResult<Self> {
        self.decorated.version(version).map(Restricted::new)
    }

    fn apply(self, apply: bool) -> PluginRequestResult<Self> {
        if !apply {
            return Err(PluginRequestError::ApplyFalseForbidden);
        }
        self.decorated.apply(apply).map(Restricted::new)
    }
}
