//! Built-in default documents, embedded at compile time.

use std::collections::BTreeMap;
use std::path::Path;

use super::error::ConfigError;
use super::schema::{
    BranchingStrategy, PartialConfig, PartialVersionSettings, ProjectType, VersionFileRule,
    WorkflowMode,
};

const GITFLOW: &str = include_str!("../templates/gitflow.yaml");
const GITHUB_FLOW: &str = include_str!("../templates/github-flow.yaml");
const TRUNK: &str = include_str!("../templates/trunk.yaml");
const VERSION_FILES: &str = include_str!("../templates/version_files.yaml");

/// Placeholder in version-file paths replaced with the package name.
const PROJECT_PLACEHOLDER: &str = "__project__";

/// Default changelog location.
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";

/// Branch settings for a strategy: main/develop branches and branch types.
pub fn strategy_template(strategy: BranchingStrategy) -> Result<PartialConfig, ConfigError> {
    let (name, source) = match strategy {
        BranchingStrategy::Gitflow => ("gitflow", GITFLOW),
        BranchingStrategy::GithubFlow => ("github-flow", GITHUB_FLOW),
        BranchingStrategy::Trunk => ("trunk", TRUNK),
    };
    serde_yaml::from_str(source).map_err(|source| ConfigError::Template { name, source })
}

/// Version files conventionally holding the version for `project_type`.
pub fn version_files(
    project_type: ProjectType,
    package: &str,
) -> Result<Vec<VersionFileRule>, ConfigError> {
    let mut by_type: BTreeMap<String, Vec<VersionFileRule>> = serde_yaml::from_str(VERSION_FILES)
        .map_err(|source| ConfigError::Template {
            name: "version_files",
            source,
        })?;

    let files = by_type.remove(project_type.as_str()).unwrap_or_default();
    Ok(files
        .into_iter()
        .map(|rule| VersionFileRule {
            path: rule.path.replace(PROJECT_PLACEHOLDER, package),
            pattern: rule.pattern,
        })
        .collect())
}

/// Complete default document for a project type and strategy.
pub fn default_document(
    project_type: ProjectType,
    strategy: BranchingStrategy,
    package: &str,
) -> Result<PartialConfig, ConfigError> {
    let mut doc = strategy_template(strategy)?;
    doc.project_type = Some(project_type.to_string());
    doc.workflow_mode = Some(WorkflowMode::default().to_string());
    doc.version = Some(PartialVersionSettings {
        changelog: Some(DEFAULT_CHANGELOG.to_string()),
        ..PartialVersionSettings::from_files(version_files(project_type, package)?)
    });
    Ok(doc)
}

/// Package name derived from the project directory: dashes become underscores.
pub fn package_name(root: &Path) -> String {
    root.file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| "project".to_string(), |n| n.replace('-', "_"))
}
