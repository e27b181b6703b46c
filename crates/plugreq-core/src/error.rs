//! Unified error types for plugin request collection.
//!
//! Every failure a plugins block can produce is a [`PluginRequestError`].
//! Immediate failures (bad id, bad version, forbidden `apply(false)`) are raised
//! inline with the declaring call and carry no location; the host attaches one.
//! Duplicate detection happens at finalization and carries its own [`Location`].

use std::fmt;

use thiserror::Error;

use crate::id::PluginId;

/// Reason attached to identifier and version errors for missing values.
pub const EMPTY_VALUE: &str = "cannot be null or empty";

// =============================================================================
// Location
// =============================================================================

/// A script display name plus a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Human-readable name of the script, as supplied by its script source.
    pub script_display_name: String,
    /// Line the failing declaration was made on.
    pub line_number: u32,
}

impl Location {
    /// Creates a new location.
    pub fn new(script_display_name: impl Into<String>, line_number: u32) -> Self {
        Self {
            script_display_name: script_display_name.into(),
            line_number,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line: {}", self.script_display_name, self.line_number)
    }
}

// =============================================================================
// Error kinds
// =============================================================================

/// Coarse classification of a [`PluginRequestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An identifier or version failed field validation.
    Validation,
    /// A declaration used a capability the collector does not allow.
    PolicyViolation,
    /// The declarations are inconsistent as a whole.
    Consistency,
}

// =============================================================================
// Plugin Request Errors
// =============================================================================

/// Errors raised while declaring or finalizing plugin requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginRequestError {
    /// The plugin identifier was missing, empty, or syntactically invalid.
    #[error("plugin id '{}' is invalid: {reason}", .id.as_deref().unwrap_or("null"))]
    InvalidPluginId {
        /// The rejected value, `None` when no value was supplied at all.
        id: Option<String>,
        /// Why the value was rejected.
        reason: String,
    },

    /// The plugin version was missing or empty.
    #[error("plugin version '{}' is invalid: {reason}", .version.as_deref().unwrap_or("null"))]
    InvalidPluginVersion {
        /// The rejected value, `None` when no value was supplied at all.
        version: Option<String>,
        /// Why the value was rejected.
        reason: String,
    },

    /// `apply(false)` was declared in a context that forbids it.
    #[error("plugin requests with 'apply false' are not supported in this context")]
    ApplyFalseForbidden,

    /// The same plugin identifier was requested more than once.
    #[error("{location}: plugin with id '{id}' was already requested at line {first_line}")]
    DuplicateRequest {
        /// The identifier requested twice.
        id: PluginId,
        /// Line of the earliest declaration of `id`.
        first_line: u32,
        /// Where the repeated declaration was made.
        location: Location,
    },
}

impl PluginRequestError {
    /// Creates an invalid plugin id error.
    pub fn invalid_id(id: Option<&str>, reason: impl Into<String>) -> Self {
        Self::InvalidPluginId {
            id: id.map(str::to_owned),
            reason: reason.into(),
        }
    }

    /// Creates an invalid plugin version error.
    pub fn invalid_version(version: Option<&str>, reason: impl Into<String>) -> Self {
        Self::InvalidPluginVersion {
            version: version.map(str::to_owned),
            reason: reason.into(),
        }
    }

    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPluginId { .. } | Self::InvalidPluginVersion { .. } => {
                ErrorKind::Validation
            }
            Self::ApplyFalseForbidden => ErrorKind::PolicyViolation,
            Self::DuplicateRequest { .. } => ErrorKind::Consistency,
        }
    }

    /// The error text without any location prefix.
    ///
    /// Equal to the `Display` output for every variant except
    /// `DuplicateRequest`, whose `Display` starts with its location.
    pub fn message(&self) -> String {
        match self {
            Self::DuplicateRequest { id, first_line, .. } => {
                format!("plugin with id '{id}' was already requested at line {first_line}")
            }
            other => other.to_string(),
        }
    }

    /// Returns the location this error was attributed to, if it carries one.
    ///
    /// Only finalization errors are located here; immediate errors are left
    /// for the host to place.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::DuplicateRequest { location, .. } => Some(location),
            _ => None,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for plugin request operations.
pub type PluginRequestResult<T> = Result<T, PluginRequestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id_message_for_missing_value() {
        let err = PluginRequestError::invalid_id(None, EMPTY_VALUE);
        assert_eq!(
            err.to_string(),
            "plugin id 'null' is invalid: cannot be null or empty"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.location().is_none());
    }

    #[test]
    fn test_invalid_version_message_keeps_value() {
        let err = PluginRequestError::invalid_version(Some(""), EMPTY_VALUE);
        assert_eq!(
            err.to_string(),
            "plugin version '' is invalid: cannot be null or empty"
        );
    }

    #[test]
    fn test_apply_false_is_policy_violation() {
        assert_eq!(
            PluginRequestError::ApplyFalseForbidden.kind(),
            ErrorKind::PolicyViolation
        );
    }

    #[test]
    fn test_duplicate_request_is_located() {
        let err = PluginRequestError::DuplicateRequest {
            id: PluginId::of("org.example.foo").unwrap(),
            first_line: 10,
            location: Location::new("build file 'build.script'", 12),
        };

        assert_eq!(err.kind(), ErrorKind::Consistency);
        assert_eq!(err.location().map(|l| l.line_number), Some(12));
        assert_eq!(
            err.to_string(),
            "build file 'build.script' line: 12: plugin with id 'org.example.foo' was already requested at line 10"
        );
        assert_eq!(
            err.message(),
            "plugin with id 'org.example.foo' was already requested at line 10"
        );
    }

    #[test]
    fn test_message_matches_display_for_unlocated_errors() {
        let err = PluginRequestError::invalid_version(None, EMPTY_VALUE);
        assert_eq!(err.message(), err.to_string());
        assert_eq!(
            PluginRequestError::ApplyFalseForbidden.message(),
            "plugin requests with 'apply false' are not supported in this context"
        );
    }
}
