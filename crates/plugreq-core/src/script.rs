//! Script source descriptors.
//!
//! A script source identifies the script whose plugins block is being
//! collected. The collector only reads its display name, for error attribution.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Read-only handle identifying the script being evaluated.
pub trait ScriptSource: Debug + Send + Sync {
    /// Human-readable name used in error messages, e.g. `build file 'app/build.script'`.
    fn display_name(&self) -> &str;

    /// Backing file, when the script came from one.
    fn file_name(&self) -> Option<&Path> {
        None
    }
}

/// A [`ScriptSource`] with a fixed display name and an optional backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedScriptSource {
    display_name: String,
    file_name: Option<PathBuf>,
}

impl NamedScriptSource {
    /// Creates a script source with the given display name and no file.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            file_name: None,
        }
    }

    /// Creates a script source for a file, displayed as `<kind> '<path>'`.
    pub fn from_file(kind: &str, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            display_name: format!("{kind} '{}'", path.display()),
            file_name: Some(path),
        }
    }
}

impl ScriptSource for NamedScriptSource {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_display_name() {
        let source = NamedScriptSource::from_file("build file", "app/build.script");
        assert_eq!(source.display_name(), "build file 'app/build.script'");
        assert_eq!(source.file_name(), Some(Path::new("app/build.script")));
    }

    #[test]
    fn test_named_source_has_no_file() {
        let source = NamedScriptSource::new("settings");
        assert_eq!(source.display_name(), "settings");
        assert!(source.file_name().is_none());
    }
}
