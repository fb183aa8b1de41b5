//! Configuration documents: schema, discovery, merge, and validation.

pub mod detector;
pub mod error;
pub mod loader;
pub mod schema;
pub mod templates;
pub mod validator;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

pub use detector::{Confidence, DetectionResult, DirectoryListing};
pub use error::ConfigError;
pub use loader::{ConfigLayer, ConfigLoader, FieldOrigin, Provenance, ResolvedConfig};
pub use schema::{
    BranchTypeRule, BranchingStrategy, ConfigurationDocument, FieldError, PartialConfig,
    ProjectType, SchemaValidationError, VersionBump, VersionFileRule, WorkflowMode,
};
pub use validator::ValidationReport;

use crate::utils::fs::write_atomic;

/// Choices for writing a default project document.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Project type; detected when unset.
    pub project_type: Option<ProjectType>,
    /// Branching strategy; gitflow when unset.
    pub strategy: Option<BranchingStrategy>,
    /// Overwrite an existing project document.
    pub force: bool,
}

/// What `init_document` wrote.
#[derive(Debug, Clone, Serialize)]
pub struct InitOutcome {
    /// Path of the written document.
    pub path: PathBuf,
    /// Project type used for the defaults.
    pub project_type: ProjectType,
    /// Strategy used for the defaults.
    pub branching_strategy: BranchingStrategy,
    /// Detection result, when the project type was not given.
    pub detection: Option<DetectionResult>,
}

/// Writes the built-in default document to the project root.
///
/// Refuses to replace an existing project document unless `force` is set.
pub fn init_document(root: &Path, options: &InitOptions) -> Result<InitOutcome, ConfigError> {
    let existing = loader::DOCUMENT_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file());
    if let (Some(path), false) = (&existing, options.force) {
        return Err(ConfigError::AlreadyExists { path: path.clone() });
    }
    let path = existing.unwrap_or_else(|| root.join(loader::DOCUMENT_FILE_NAMES[0]));

    let (project_type, detection) = match options.project_type {
        Some(project_type) => (project_type, None),
        None => {
            let detection = detector::detect_dir(root).map_err(|source| ConfigError::Scan {
                path: root.to_path_buf(),
                source,
            })?;
            (detection.project_type, Some(detection))
        }
    };
    let strategy = options.strategy.unwrap_or_default();

    let partial =
        templates::default_document(project_type, strategy, &templates::package_name(root))?;
    // Only write documents that would resolve cleanly.
    schema::validate(&partial)?;

    let yaml = serde_yaml::to_string(&partial).map_err(ConfigError::Serialize)?;
    write_atomic(&path, yaml.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), %project_type, %strategy, "Wrote default configuration");

    Ok(InitOutcome {
        path,
        project_type,
        branching_strategy: strategy,
        detection,
    })
}
