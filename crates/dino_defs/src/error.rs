//! Error types for definition loading

use std::path::PathBuf;
use thiserror::Error;

/// Definition registry errors
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Data could not be parsed (syntax error or missing required field)
    #[error("Failed to parse {source_name}: {error}")]
    Parse {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },

    /// Data parsed but failed validation
    #[error("Malformed definition '{id}': {reason}")]
    Malformed { id: String, reason: String },

    /// A species or boss id is not registered
    #[error("Definition not found: {0}")]
    NotFound(String),

    /// Definition file could not be read
    #[error("Failed to read {path:?}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl DefinitionError {
    pub(crate) fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error must stop the simulation from starting
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

/// Result type for definition operations
pub type Result<T> = std::result::Result<T, DefinitionError>;
