//! Error types for configuration resolution.

use std::path::PathBuf;

use thiserror::Error;

use super::loader::ConfigLayer;
use super::schema::SchemaValidationError;

/// Failure to produce a resolved configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A layer document exists but could not be read.
    #[error("failed to read {layer} configuration at {}", path.display())]
    Read {
        /// Layer the document belongs to.
        layer: ConfigLayer,
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A layer document exists but is not a well-formed configuration document.
    #[error("failed to parse {layer} configuration at {}", path.display())]
    Parse {
        /// Layer the document belongs to.
        layer: ConfigLayer,
        /// Document path.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: serde_yaml::Error,
    },

    /// The merged document failed schema validation.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    /// A built-in template could not be parsed.
    #[error("built-in template `{name}` is malformed")]
    Template {
        /// Template name.
        name: &'static str,
        /// Parser diagnostic.
        #[source]
        source: serde_yaml::Error,
    },

    /// The project directory could not be scanned for detection.
    #[error("failed to scan {} for project type detection", path.display())]
    Scan {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// `init` would overwrite an existing document.
    #[error("{} already exists (use --force to overwrite)", path.display())]
    AlreadyExists {
        /// Existing document path.
        path: PathBuf,
    },

    /// Writing a document failed.
    #[error("failed to write configuration to {}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing a document failed.
    #[error("failed to serialize configuration document")]
    Serialize(#[source] serde_yaml::Error),
}
