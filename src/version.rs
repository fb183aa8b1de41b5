//! Version consistency checks and bumps across configured files.

pub mod bumper;
pub mod checker;
pub mod semver;

use thiserror::Error;

pub use bumper::{bump_version, BumpOptions, BumpOutcome, FileChange};
pub use checker::{check_versions, FileVersion, VersionReport};
pub use semver::{SemanticVersion, VersionPart};

use crate::pattern::PatternCompileError;

/// Failure while reading or rewriting version files.
#[derive(Error, Debug)]
pub enum VersionError {
    /// The document configures no version files.
    #[error("no version files are configured")]
    NoVersionFiles,

    /// A configured version file does not exist.
    #[error("version file '{path}' not found")]
    FileNotFound {
        /// Path relative to the project root.
        path: String,
    },

    /// A version file could not be read.
    #[error("failed to read version file '{path}'")]
    Read {
        /// Path relative to the project root.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A version file's pattern does not match its content.
    #[error("pattern did not match in '{path}': {pattern}")]
    NoMatch {
        /// Path relative to the project root.
        path: String,
        /// The configured pattern.
        pattern: String,
    },

    /// A version pattern does not compile.
    #[error(transparent)]
    Pattern(#[from] PatternCompileError),

    /// A version string is not a semantic version.
    #[error("'{version}' is not a valid semantic version")]
    InvalidVersion {
        /// Offending text.
        version: String,
    },

    /// Incrementing a component would exceed `u64::MAX`.
    #[error("cannot bump {part} component of {version}: it would overflow")]
    Overflow {
        /// Version being bumped.
        version: String,
        /// Component that could not be incremented.
        part: VersionPart,
    },

    /// Files disagree; nothing was written.
    #[error("refusing to bump: {}", report.summary())]
    Inconsistent {
        /// Full per-file breakdown.
        report: Box<VersionReport>,
    },

    /// Writing the first file failed; nothing was changed.
    #[error("failed to write version file '{path}'")]
    Write {
        /// Path relative to the project root.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A write failed after other files were already updated.
    #[error(
        "failed to write version file '{failed}' after updating {}; reconcile these files manually",
        updated.join(", ")
    )]
    PartialWrite {
        /// Files already rewritten with the new version.
        updated: Vec<String>,
        /// File whose write failed.
        failed: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
