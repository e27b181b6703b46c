//! Finalized plugin requests.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::id::PluginId;
use crate::script::ScriptSource;

// ─── PluginRequest ────────────────────────────────────────────────────────────

/// The validated, immutable record for one declared plugin.
///
/// Only the collector's finalization step creates these.
#[derive(Debug, Clone)]
pub struct PluginRequest {
    id: PluginId,
    version: Option<String>,
    apply: bool,
    line_number: u32,
    script_source: Arc<dyn ScriptSource>,
}

impl PluginRequest {
    pub(crate) fn new(
        id: PluginId,
        version: Option<String>,
        apply: bool,
        line_number: u32,
        script_source: Arc<dyn ScriptSource>,
    ) -> Self {
        Self {
            id,
            version,
            apply,
            line_number,
            script_source,
        }
    }

    /// The requested plugin.
    pub fn id(&self) -> &PluginId {
        &self.id
    }

    /// The requested version, if one was declared.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Whether the plugin should be applied automatically.
    pub fn apply(&self) -> bool {
        self.apply
    }

    /// Line the request was declared on.
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// The script the request was declared in.
    pub fn script_source(&self) -> &Arc<dyn ScriptSource> {
        &self.script_source
    }

    /// Display name of the declaring script.
    pub fn script_display_name(&self) -> &str {
        self.script_source.display_name()
    }
}

impl PartialEq for PluginRequest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.version == other.version
            && self.apply == other.apply
            && self.line_number == other.line_number
            && self.script_display_name() == other.script_display_name()
    }
}

impl Eq for PluginRequest {}

impl fmt::Display for PluginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[id: '{}'", self.id)?;
        if let Some(version) = &self.version {
            write!(f, ", version: '{version}'")?;
        }
        if !self.apply {
            f.write_str(", apply: false")?;
        }
        f.write_str("]")
    }
}

// ─── PluginRequests ───────────────────────────────────────────────────────────

static EMPTY: LazyLock<PluginRequests> = LazyLock::new(|| PluginRequests {
    requests: Arc::from(Vec::new()),
});

/// An ordered, duplicate-free, immutable sequence of [`PluginRequest`]s.
///
/// Cloning is cheap; clones share the same storage.
#[derive(Debug, Clone)]
pub struct PluginRequests {
    requests: Arc<[PluginRequest]>,
}

impl PluginRequests {
    /// The shared empty sequence. Every call returns the same storage.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    pub(crate) fn from_vec(requests: Vec<PluginRequest>) -> Self {
        Self {
            requests: Arc::from(requests),
        }
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns `true` if there are no requests.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Iterates requests in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PluginRequest> {
        self.requests.iter()
    }

    /// Returns the request at `index`.
    pub fn get(&self, index: usize) -> Option<&PluginRequest> {
        self.requests.get(index)
    }

    /// Finds the request for `id`.
    pub fn find(&self, id: &PluginId) -> Option<&PluginRequest> {
        self.requests.iter().find(|request| request.id() == id)
    }

    /// Returns the requests as a slice.
    pub fn as_slice(&self) -> &[PluginRequest] {
        &self.requests
    }

    /// Returns `true` if both values share the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.requests, &other.requests)
    }
}

impl PartialEq for PluginRequests {
    fn eq(&self, other: &Self) -> bool {
        self.requests == other.requests
    }
}

impl Eq for PluginRequests {}

impl<'a> IntoIterator for &'a PluginRequests {
    type Item = &'a PluginRequest;
    type IntoIter = std::slice::Iter<'a, PluginRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::NamedScriptSource;

    fn request(id: &str, version: Option<&str>, apply: bool) -> PluginRequest {
        PluginRequest::new(
            PluginId::of(id).unwrap(),
            version.map(str::to_owned),
            apply,
            3,
            Arc::new(NamedScriptSource::new("test script")),
        )
    }

    #[test]
    fn test_display_omits_defaults() {
        assert_eq!(request("a", None, true).to_string(), "[id: 'a']");
        assert_eq!(
            request("a", Some("1.0"), false).to_string(),
            "[id: 'a', version: '1.0', apply: false]"
        );
    }

    #[test]
    fn test_empty_is_shared() {
        let first = PluginRequests::empty();
        let second = PluginRequests::empty();
        assert!(first.is_empty());
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn test_find_and_order() {
        let requests = PluginRequests::from_vec(vec![
            request("a", None, true),
            request("b", Some("2.0"), true),
        ]);

        assert_eq!(requests.len(), 2);
        let ids: Vec<_> = requests.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, ["a", "b"]);

        let b = requests.find(&PluginId::of("b").unwrap()).unwrap();
        assert_eq!(b.version(), Some("2.0"));
        assert_eq!(b.script_display_name(), "test script");
        assert!(requests.find(&PluginId::of("c").unwrap()).is_none());
    }
}
