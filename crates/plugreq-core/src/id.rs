//! Plugin identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EMPTY_VALUE, PluginRequestError, PluginRequestResult};

/// Separator between namespace segments of a qualified plugin id.
pub const SEPARATOR: char = '.';

/// A non-empty, comparable plugin identifier such as `org.example.greeting`.
///
/// Equality and hashing are structural over the stored string. Construction
/// only rejects empty values; the stricter id syntax is available through
/// [`PluginId::validate`] for hosts that want it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginId(String);

impl PluginId {
    /// Creates an identifier, failing with `InvalidPluginId` on an empty value.
    pub fn of(value: &str) -> PluginRequestResult<Self> {
        if value.is_empty() {
            return Err(PluginRequestError::invalid_id(Some(value), EMPTY_VALUE));
        }
        Ok(Self(value.to_owned()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last separator, or `None` for unqualified ids.
    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once(SEPARATOR).map(|(namespace, _)| namespace)
    }

    /// The segment after the last separator.
    pub fn name(&self) -> &str {
        self.0
            .rsplit_once(SEPARATOR)
            .map_or(self.0.as_str(), |(_, name)| name)
    }

    /// Returns `true` if the id contains a namespace.
    pub fn is_qualified(&self) -> bool {
        self.0.contains(SEPARATOR)
    }

    /// Qualifies an unqualified id with `namespace`; qualified ids are returned as-is.
    pub fn with_namespace(&self, namespace: &str) -> Self {
        if self.is_qualified() || namespace.is_empty() {
            return self.clone();
        }
        Self(format!("{namespace}{SEPARATOR}{}", self.0))
    }

    /// Checks `value` against the plugin id syntax.
    ///
    /// Valid ids are non-empty, use only ASCII alphanumerics, `.`, `_` and `-`,
    /// do not begin or end with `.`, and never contain `..`.
    pub fn validate(value: &str) -> PluginRequestResult<()> {
        let invalid = |reason: String| -> PluginRequestResult<()> {
            Err(PluginRequestError::invalid_id(Some(value), reason))
        };

        if value.is_empty() {
            return invalid(EMPTY_VALUE.to_owned());
        }

        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return invalid(format!(
                "contains invalid char '{c}' (only ASCII alphanumeric characters, '.', '_' and '-' characters are valid)"
            ));
        }

        if value.starts_with(SEPARATOR) || value.ends_with(SEPARATOR) {
            return invalid(format!("cannot begin or end with '{SEPARATOR}'"));
        }

        if value.contains("..") {
            return invalid(format!("cannot contain '{SEPARATOR}{SEPARATOR}'"));
        }

        Ok(())
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PluginId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PluginId {
    type Error = PluginRequestError;

    fn try_from(value: String) -> PluginRequestResult<Self> {
        if value.is_empty() {
            return Err(PluginRequestError::invalid_id(Some(""), EMPTY_VALUE));
        }
        Ok(Self(value))
    }
}

impl From<PluginId> for String {
    fn from(id: PluginId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_is_rejected() {
        let err = PluginId::of("").unwrap_err();
        assert!(matches!(err, PluginRequestError::InvalidPluginId { .. }));
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(PluginId::of("a.b").unwrap(), PluginId::of("a.b").unwrap());
        assert_ne!(PluginId::of("a.b").unwrap(), PluginId::of("a.c").unwrap());
    }

    #[test]
    fn test_namespace_and_name() {
        let id = PluginId::of("org.example.greeting").unwrap();
        assert_eq!(id.namespace(), Some("org.example"));
        assert_eq!(id.name(), "greeting");
        assert!(id.is_qualified());

        let bare = PluginId::of("java").unwrap();
        assert_eq!(bare.namespace(), None);
        assert_eq!(bare.name(), "java");
        assert!(!bare.is_qualified());
    }

    #[test]
    fn test_with_namespace() {
        let bare = PluginId::of("java").unwrap();
        assert_eq!(bare.with_namespace("org.core").as_str(), "org.core.java");

        let qualified = PluginId::of("com.acme.java").unwrap();
        assert_eq!(qualified.with_namespace("org.core"), qualified);
    }

    #[test]
    fn test_validate_syntax() {
        assert!(PluginId::validate("org.example-plugin_2").is_ok());
        assert!(PluginId::validate("").is_err());
        assert!(PluginId::validate("has space").is_err());
        assert!(PluginId::validate(".leading").is_err());
        assert!(PluginId::validate("trailing.").is_err());
        assert!(PluginId::validate("double..dot").is_err());
    }

    #[test]
    fn test_validate_reports_offending_char() {
        let err = PluginId::validate("foo/bar").unwrap_err();
        assert!(err.to_string().contains("invalid char '/'"));
    }

    #[test]
    fn test_serde_rejects_empty() {
        let id: PluginId = serde_json::from_str("\"org.example\"").unwrap();
        assert_eq!(id.as_str(), "org.example");
        assert!(serde_json::from_str::<PluginId>("\"\"").is_err());
    }
}
