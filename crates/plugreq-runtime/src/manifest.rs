//! Plugins manifests: a plugins block written down as TOML.
//!
//! ```toml
//! [[plugins]]
//! id = "org.example.base"
//!
//! [[plugins]]
//! id = "org.example.greeting"
//! version = "1.2"
//! apply = false
//! ```
//!
//! Each entry becomes one [`Declaration`]. Its line is the line of its `id`
//! key (or of where the entry starts when the id is missing) unless the
//! entry gives one explicitly with `line = N`. The block line is where the
//! first entry starts.

use std::path::Path;

use plugreq_core::NamedScriptSource;
use serde::Deserialize;
use tracing::debug;

use crate::error::{RuntimeError, RuntimeResult};

const MANIFEST_KIND: &str = "plugins manifest";

/// One `id(...)` call with its optional `version(...)` and `apply(...)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    pub id: Option<String>,
    pub version: Option<String>,
    pub apply: Option<bool>,
    /// Line the declaration is attributed to; the block line when `None`.
    pub line: Option<u32>,
}

impl Declaration {
    /// A declaration of `id` with no version and the default apply flag.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn apply(mut self, apply: bool) -> Self {
        self.apply = Some(apply);
        self
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// A plugins block ready to be replayed by a [`BlockHost`](crate::BlockHost).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginsBlock {
    pub script: NamedScriptSource,
    pub block_line: u32,
    pub declarations: Vec<Declaration>,
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    plugins: Vec<toml::Spanned<RawDeclaration>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeclaration {
    id: Option<toml::Spanned<String>>,
    version: Option<String>,
    apply: Option<bool>,
    line: Option<u32>,
}

impl PluginsBlock {
    /// An empty block for `script` starting at `block_line`.
    pub fn new(script: NamedScriptSource, block_line: u32) -> Self {
        Self {
            script,
            block_line,
            declarations: Vec::new(),
        }
    }

    /// Appends a declaration.
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Parses manifest text. `display_name` names the script in errors.
    pub fn from_toml_str(display_name: &str, text: &str) -> RuntimeResult<Self> {
        Self::parse(NamedScriptSource::new(display_name), text)
    }

    /// Reads and parses a manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(NamedScriptSource::from_file(MANIFEST_KIND, path), &text)
    }

    fn parse(script: NamedScriptSource, text: &str) -> RuntimeResult<Self> {
        use plugreq_core::ScriptSource as _;

        let raw: RawManifest = toml::from_str(text).map_err(|source| RuntimeError::Manifest {
            script: script.display_name().to_string(),
            source,
        })?;

        // An entry's span starts at its `[[plugins]]` header or inline table.
        let block_line = raw
            .plugins
            .first()
            .map_or(1, |entry| line_of_offset(text, entry.span().start));

        let declarations = raw
            .plugins
            .into_iter()
            .map(|entry| {
                let start_line = line_of_offset(text, entry.span().start);
                let entry = entry.into_inner();
                let id_line = entry
                    .id
                    .as_ref()
                    .map(|id| line_of_offset(text, id.span().start));
                Declaration {
                    line: Some(entry.line.or(id_line).unwrap_or(start_line)),
                    id: entry.id.map(toml::Spanned::into_inner),
                    version: entry.version,
                    apply: entry.apply,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            script = %script.display_name(),
            block_line,
            declarations = declarations.len(),
            "Parsed plugins manifest"
        );

        Ok(Self {
            script,
            block_line,
            declarations,
        })
    }
}

/// 1-based line of byte `offset` in `text`.
fn line_of_offset(text: &str, offset: usize) -> u32 {
    let before = text.get(..offset).unwrap_or(text);
    let newlines = before.bytes().filter(|b| *b == b'\n').count();
    u32::try_from(newlines + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use plugreq_core::ScriptSource;

    use super::*;

    const MANIFEST: &str = r#"# plugins for the demo build

[[plugins]]
id = "org.example.base"

[[plugins]]
id = "org.example.greeting"
version = "1.2"
apply = false

[[plugins]]
line = 42
id = "org.example.lint"
"#;

    #[test]
    fn test_parse_lines() {
        let block = PluginsBlock::from_toml_str("build file 'build.script'", MANIFEST).unwrap();
        assert_eq!(block.script.display_name(), "build file 'build.script'");
        assert_eq!(block.block_line, 3);
        assert_eq!(
            block.declarations,
            vec![
                Declaration::new("org.example.base").at_line(4),
                Declaration::new("org.example.greeting")
                    .version("1.2")
                    .apply(false)
                    .at_line(7),
                Declaration::new("org.example.lint").at_line(42),
            ]
        );
    }

    #[test]
    fn test_missing_id_uses_header_line() {
        let text = "[[plugins]]\nid = \"a\"\n\n[[plugins]]\nversion = \"1.0\"\n";
        let block = PluginsBlock::from_toml_str("m", text).unwrap();
        assert_eq!(block.declarations[1].id, None);
        assert_eq!(block.declarations[1].line, Some(4));
    }

    #[test]
    fn test_spaced_headers() {
        let text = "# spaced\n\n[[ plugins ]]\nid = \"a\"\n\n[[ plugins ]]\nversion = \"1.0\"\n";
        let block = PluginsBlock::from_toml_str("m", text).unwrap();
        assert_eq!(block.block_line, 3);
        assert_eq!(block.declarations[0].line, Some(4));
        assert_eq!(block.declarations[1].id, None);
        assert_eq!(block.declarations[1].line, Some(6));
    }

    #[test]
    fn test_header_text_inside_string_ignored() {
        let text = r#"notes = """
[[plugins]]
"""

[[plugins]]
id = "a"

[[plugins]]
apply = false
"#;
        let block = PluginsBlock::from_toml_str("m", text).unwrap();
        assert_eq!(block.block_line, 5);
        assert_eq!(block.declarations.len(), 2);
        assert_eq!(block.declarations[0].line, Some(6));
        assert_eq!(block.declarations[1].line, Some(8));
        assert_eq!(block.declarations[1].apply, Some(false));
    }

    #[test]
    fn test_inline_array() {
        let text = "\n\nplugins = [\n  { id = \"a\" },\n  { id = \"b\", apply = false },\n]\n";
        let block = PluginsBlock::from_toml_str("m", text).unwrap();
        assert_eq!(block.block_line, 4);
        assert_eq!(block.declarations[0].line, Some(4));
        assert_eq!(block.declarations[1].line, Some(5));
        assert_eq!(block.declarations[1].apply, Some(false));
    }

    #[test]
    fn test_empty_manifest() {
        let block = PluginsBlock::from_toml_str("m", "").unwrap();
        assert_eq!(block.block_line, 1);
        assert!(block.declarations.is_empty());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = PluginsBlock::from_toml_str("m", "[[plugins]]\nid = \"a\"\nversoin = \"1\"\n")
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Manifest { ref script, .. } if script == "m"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = PluginsBlock::from_file("/definitely/not/here/plugins.toml").unwrap_err();
        assert!(matches!(err, RuntimeError::Io { .. }));
    }

    #[test]
    fn test_from_file_display_name() {
        let path = std::env::temp_dir().join(format!("plugreq-manifest-{}.toml", std::process::id()));
        std::fs::write(&path, "[[plugins]]\nid = \"a\"\n").unwrap();

        let block = PluginsBlock::from_file(&path).unwrap();
        assert_eq!(
            block.script.display_name(),
            format!("plugins manifest '{}'", path.display())
        );
        assert_eq!(block.script.file_name(), Some(path.as_path()));
    }

    #[test]
    fn test_line_of_offset() {
        assert_eq!(line_of_offset("abc", 0), 1);
        assert_eq!(line_of_offset("a\nb\nc", 4), 3);
    }
}
