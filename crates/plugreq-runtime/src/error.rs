//! Runtime error types.

use std::path::PathBuf;

use plugreq_core::{Location, PluginRequestError};
use thiserror::Error;

use crate::config::ConfigError;

/// A declaration error placed at the line it was raised on.
///
/// The core leaves immediate errors unlocated; the host builds one of these
/// because it knows which declaration it was replaying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{location}: {source}")]
pub struct LocatedError {
    /// Where the failing declaration was made.
    pub location: Location,
    /// The underlying request error.
    pub source: PluginRequestError,
}

impl LocatedError {
    /// Attaches `location` to `source`.
    pub fn new(location: Location, source: PluginRequestError) -> Self {
        Self { location, source }
    }
}

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Finalization failed (already carries its own location).
    #[error(transparent)]
    Request(#[from] PluginRequestError),

    /// A declaration failed while the block was replayed.
    #[error(transparent)]
    Located(#[from] LocatedError),

    /// The manifest text is not a valid plugins manifest.
    #[error("Failed to parse plugins manifest {script}: {source}")]
    Manifest {
        /// Display name of the manifest script.
        script: String,
        /// The TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The manifest file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl RuntimeError {
    /// Returns the location of a request error, wherever it was attached.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Located(err) => Some(&err.location),
            Self::Request(err) => err.location(),
            _ => None,
        }
    }

    /// Returns the underlying request error, if this is one.
    pub fn request_error(&self) -> Option<&PluginRequestError> {
        match self {
            Self::Located(err) => Some(&err.source),
            Self::Request(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
