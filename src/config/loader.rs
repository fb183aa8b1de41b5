//! Layered configuration discovery and merge.
//!
//! Resolution reads three layers from disk on every call, team then project
//! then user, merges them with later layers winning, and validates the
//! result through the schema. When no layer exists at all, a default
//! document is synthesized from the detected project type.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use super::detector::{self, DetectionResult};
use super::error::ConfigError;
use super::schema::{
    self, BranchingStrategy, ConfigurationDocument, OrderedMap, PartialBranchTypeRule,
    PartialConfig,
};
use super::templates;

/// File names for the team and project layers, in lookup order.
pub const DOCUMENT_FILE_NAMES: [&str; 2] = [".practices.yaml", ".practices.yml"];

/// File names for the per-project user layer, in lookup order.
pub const USER_FILE_NAMES: [&str; 2] = [".practices.user.yaml", ".practices.user.yml"];

/// Environment variable naming an explicit team document.
pub const TEAM_CONFIG_ENV: &str = "PRACTICES_TEAM_CONFIG";

/// Environment variable naming an explicit user document.
pub const USER_CONFIG_ENV: &str = "PRACTICES_USER_CONFIG";

/// A configuration scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLayer {
    /// Organization-wide defaults.
    Team,
    /// The project's own document.
    Project,
    /// Personal overrides.
    User,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Team => "team",
            Self::Project => "project",
            Self::User => "user",
        })
    }
}

/// Where a top-level field's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrigin {
    /// Built-in defaults chosen from project type detection.
    Synthesized,
    /// Team layer.
    Team,
    /// Project layer.
    Project,
    /// User layer.
    User,
}

impl From<ConfigLayer> for FieldOrigin {
    fn from(layer: ConfigLayer) -> Self {
        match layer {
            ConfigLayer::Team => Self::Team,
            ConfigLayer::Project => Self::Project,
            ConfigLayer::User => Self::User,
        }
    }
}

/// Documents read for one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSource {
    /// Scope.
    pub layer: ConfigLayer,
    /// Files merged into the layer, lowest precedence first.
    pub paths: Vec<PathBuf>,
}

/// Which layers contributed to the resolved document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Provenance {
    /// Contributors per top-level field, lowest precedence first. Scalar
    /// fields list only the winning layer; mapping fields list every layer
    /// that contributed a key.
    pub fields: BTreeMap<String, Vec<FieldOrigin>>,
    /// Layer documents that were found, in merge order.
    pub layers: Vec<LayerSource>,
    /// Detection that seeded the defaults, if they were synthesized.
    pub synthesized: Option<DetectionResult>,
}

impl Provenance {
    /// Whether defaults were synthesized because no layer existed.
    pub fn is_synthesized(&self) -> bool {
        self.synthesized.is_some()
    }

    /// Highest-precedence contributor of a top-level field.
    pub fn origin(&self, field: &str) -> Option<FieldOrigin> {
        self.fields.get(field).and_then(|o| o.last().copied())
    }

    fn record(&mut self, field: &str, origin: FieldOrigin, replace: bool) {
        let origins = self.fields.entry(field.to_string()).or_default();
        if replace {
            origins.clear();
        }
        if !origins.contains(&origin) {
            origins.push(origin);
        }
    }
}

/// A validated document plus where its values came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    /// Project root the configuration was resolved for.
    pub root: PathBuf,
    /// The validated document.
    pub document: ConfigurationDocument,
    /// Layer contributions.
    pub provenance: Provenance,
}

/// Discovers and merges configuration layers for a project root.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    team_config: Option<PathBuf>,
    team_search: bool,
    user_config: Option<PathBuf>,
    global_user_config: bool,
}

impl ConfigLoader {
    /// Loader with default discovery and no environment overrides.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            team_config: None,
            team_search: true,
            user_config: None,
            global_user_config: true,
        }
    }

    /// Loader honouring `PRACTICES_TEAM_CONFIG` and `PRACTICES_USER_CONFIG`.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        let mut loader = Self::new(root);
        if let Some(path) = env_path(TEAM_CONFIG_ENV) {
            loader = loader.with_team_config(path);
        }
        if let Some(path) = env_path(USER_CONFIG_ENV) {
            loader = loader.with_user_config(path);
        }
        loader
    }

    /// Uses an explicit team document instead of searching ancestors.
    pub fn with_team_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.team_config = Some(path.into());
        self
    }

    /// Disables the ancestor-directory search for team documents.
    pub fn without_team_search(mut self) -> Self {
        self.team_search = false;
        self
    }

    /// Uses an explicit user document.
    pub fn with_user_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_config = Some(path.into());
        self
    }

    /// Ignores the user document under the XDG config directory.
    pub fn without_global_user_config(mut self) -> Self {
        self.global_user_config = false;
        self
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the project document, if one exists.
    pub fn project_document(&self) -> Option<PathBuf> {
        find_first(&self.root, &DOCUMENT_FILE_NAMES)
    }

    /// Resolves the effective configuration.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let mut provenance = Provenance::default();
        let mut layers = Vec::new();

        for layer in [ConfigLayer::Team, ConfigLayer::Project, ConfigLayer::User] {
            let paths = self.layer_paths(layer);
            if paths.is_empty() {
                debug!(%layer, "Configuration layer absent");
                continue;
            }

            let mut merged = PartialConfig::default();
            for path in &paths {
                debug!(%layer, path = %path.display(), "Reading configuration layer");
                merge_partial(&mut merged, read_layer(layer, path)?);
            }
            provenance.layers.push(LayerSource { layer, paths });
            layers.push((FieldOrigin::from(layer), merged));
        }

        if layers.is_empty() {
            let detection = detector::detect_dir(&self.root).map_err(|source| ConfigError::Scan {
                path: self.root.clone(),
                source,
            })?;
            info!(
                project_type = %detection.project_type,
                confidence = %detection.confidence,
                "No configuration found; synthesizing defaults"
            );
            let defaults = templates::default_document(
                detection.project_type,
                BranchingStrategy::default(),
                &templates::package_name(&self.root),
            )?;
            layers.push((FieldOrigin::Synthesized, defaults));
            provenance.synthesized = Some(detection);
        }

        let mut merged = PartialConfig::default();
        for (origin, layer) in layers {
            record_fields(&mut provenance, &layer, origin);
            merge_partial(&mut merged, layer);
        }

        let document = schema::validate(&merged)?;
        Ok(ResolvedConfig {
            root: self.root.clone(),
            document,
            provenance,
        })
    }

    fn layer_paths(&self, layer: ConfigLayer) -> Vec<PathBuf> {
        match layer {
            ConfigLayer::Team => self.team_paths(),
            ConfigLayer::Project => self.project_document().into_iter().collect(),
            ConfigLayer::User => self.user_path().into_iter().collect(),
        }
    }

    fn team_paths(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.team_config {
            if path.is_file() {
                return vec![path.clone()];
            }
            warn!(path = %path.display(), "Team configuration file not found");
            return Vec::new();
        }
        if !self.team_search {
            return Vec::new();
        }

        let root = fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());
        let mut found: Vec<PathBuf> = root
            .ancestors()
            .skip(1)
            .filter_map(|dir| find_first(dir, &DOCUMENT_FILE_NAMES))
            .collect();
        // Farthest ancestor first so nearer directories override it.
        found.reverse();
        found
    }

    fn user_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.user_config {
            if path.is_file() {
                return Some(path.clone());
            }
            warn!(path = %path.display(), "User configuration file not found");
            return None;
        }
        if let Some(path) = find_first(&self.root, &USER_FILE_NAMES) {
            return Some(path);
        }
        if !self.global_user_config {
            return None;
        }
        xdg_config_dir()
            .map(|dir| dir.join("config.yaml"))
            .filter(|path| path.is_file())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// `$XDG_CONFIG_HOME/practices`, falling back to `$HOME/.config/practices`.
fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_home.is_empty() {
            return Some(PathBuf::from(xdg_home).join("practices"));
        }
    }
    dirs::home_dir().map(|home| home.join(".config").join("practices"))
}

fn find_first(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Reads one layer document. An empty document is an empty layer.
pub fn read_layer(layer: ConfigLayer, path: &Path) -> Result<PartialConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        layer,
        path: path.to_path_buf(),
        source,
    })?;
    parse_layer(layer, path, &text)
}

/// Parses layer text; `path` is only used for error reporting.
pub fn parse_layer(layer: ConfigLayer, path: &Path, text: &str) -> Result<PartialConfig, ConfigError> {
    let parse_error = |source| ConfigError::Parse {
        layer,
        path: path.to_path_buf(),
        source,
    };

    let value: Value = serde_yaml::from_str(text).map_err(parse_error)?;
    if value.is_null() {
        return Ok(PartialConfig::default());
    }
    serde_yaml::from_value(value).map_err(parse_error)
}

/// Overlays `higher` onto `base`, `higher` winning.
///
/// Scalars take the higher non-null value. `branches` merges per key and
/// per rule field. `version.files` is replaced wholesale, while other keys of
/// the `version` block merge per key. `jira` and `github` merge per key. Other top-level blocks are replaced wholesale.
pub fn merge_partial(base: &mut PartialConfig, higher: PartialConfig) {
    overlay(&mut base.project_type, higher.project_type);
    overlay(&mut base.branching_strategy, higher.branching_strategy);
    overlay(&mut base.workflow_mode, higher.workflow_mode);
    overlay(&mut base.main_branch, higher.main_branch);
    overlay(&mut base.develop_branch, higher.develop_branch);

    if let Some(branches) = higher.branches {
        let merged = base.branches.get_or_insert_with(OrderedMap::new);
        for (name, rule) in branches {
            match merged.get_mut(&name) {
                Some(existing) => merge_rule(existing, rule),
                None => {
                    merged.insert(name, rule);
                }
            }
        }
    }

    if let Some(version) = higher.version {
        let merged = base.version.get_or_insert_with(Default::default);
        overlay(&mut merged.files, version.files);
        overlay(&mut merged.changelog, version.changelog);
        for (key, value) in version.extra {
            if !value.is_null() {
                merged.extra.insert(key, value);
            }
        }
    }

    merge_mapping(&mut base.jira, higher.jira);
    merge_mapping(&mut base.github, higher.github);

    for (key, value) in higher.extra {
        if !value.is_null() {
            base.extra.insert(key, value);
        }
    }
}

fn overlay<T>(slot: &mut Option<T>, higher: Option<T>) {
    if higher.is_some() {
        *slot = higher;
    }
}

fn merge_rule(base: &mut PartialBranchTypeRule, higher: PartialBranchTypeRule) {
    overlay(&mut base.pattern, higher.pattern);
    overlay(&mut base.base, higher.base);
    overlay(&mut base.targets, higher.targets);
    overlay(&mut base.version_bump, higher.version_bump);
}

fn merge_mapping(base: &mut Option<Mapping>, higher: Option<Mapping>) {
    let Some(higher) = higher else { return };
    let merged = base.get_or_insert_with(Mapping::new);
    for (key, value) in higher {
        merged.insert(key, value);
    }
}

fn record_fields(provenance: &mut Provenance, layer: &PartialConfig, origin: FieldOrigin) {
    let scalars = [
        ("project_type", layer.project_type.is_some()),
        ("branching_strategy", layer.branching_strategy.is_some()),
        ("workflow_mode", layer.workflow_mode.is_some()),
        ("main_branch", layer.main_branch.is_some()),
        ("develop_branch", layer.develop_branch.is_some()),
    ];
    for (field, present) in scalars {
        if present {
            provenance.record(field, origin, true);
        }
    }

    let mappings = [
        ("branches", layer.branches.is_some()),
        ("version", layer.version.is_some()),
        ("jira", layer.jira.is_some()),
        ("github", layer.github.is_some()),
    ];
    for (field, present) in mappings {
        if present {
            provenance.record(field, origin, false);
        }
    }

    for (key, value) in &layer.extra {
        if let (Some(key), false) = (key.as_str(), value.is_null()) {
            provenance.record(key, origin, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::detector::Confidence;
    use crate::config::schema::{ProjectType, VersionBump, WorkflowMode};
    use tempfile::TempDir;

    fn hermetic(root: &Path) -> ConfigLoader {
        ConfigLoader::new(root)
            .without_team_search()
            .without_global_user_config()
    }

    fn write(path: &Path, text: &str) {
        fs::write(path, text).unwrap();
    }

    const TEAM: &str = r#"
project_type: python
branching_strategy: gitflow
workflow_mode: team
main_branch: main
develop_branch: develop
branches:
  feature:
    pattern: '^feature/([A-Z]+-\d+)-(.+)$'
    base: develop
  docs:
    pattern: '^docs/(.+)$'
    base: develop
version:
  files:
    - path: pyproject.toml
      pattern: 'version = "(\d+\.\d+\.\d+)"'
jira:
  project_key: TEAM
  url: https://jira.example.com
"#;

    #[test]
    fn team_only_fields_survive() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let team = dir.path().join("team.yaml");
        write(&team, TEAM);

        let resolved = hermetic(dir.path()).with_team_config(&team).resolve()?;
        let doc = &resolved.document;
        assert_eq!(doc.project_type, ProjectType::Python);
        assert_eq!(doc.workflow_mode, WorkflowMode::Team);
        assert_eq!(resolved.provenance.origin("workflow_mode"), Some(FieldOrigin::Team));
        assert!(!resolved.provenance.is_synthesized());
        Ok(())
    }

    #[test]
    fn user_overrides_project_overrides_team() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let team = dir.path().join("team.yaml");
        write(&team, TEAM);
        write(
            &dir.path().join(".practices.yaml"),
            "workflow_mode: solo\nmain_branch: trunk\n",
        );
        write(&dir.path().join(".practices.user.yaml"), "workflow_mode: team\n");

        let resolved = hermetic(dir.path()).with_team_config(&team).resolve()?;
        assert_eq!(resolved.document.workflow_mode, WorkflowMode::Team);
        assert_eq!(resolved.document.main_branch, "trunk");
        assert_eq!(resolved.provenance.origin("workflow_mode"), Some(FieldOrigin::User));
        assert_eq!(resolved.provenance.origin("main_branch"), Some(FieldOrigin::Project));
        assert_eq!(resolved.provenance.origin("project_type"), Some(FieldOrigin::Team));

        let layers: Vec<ConfigLayer> = resolved.provenance.layers.iter().map(|l| l.layer).collect();
        assert_eq!(
            layers,
            vec![ConfigLayer::Team, ConfigLayer::Project, ConfigLayer::User]
        );
        Ok(())
    }

    #[test]
    fn branch_types_merge_per_key_and_field() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let team = dir.path().join("team.yaml");
        write(&team, TEAM);
        write(
            &dir.path().join(".practices.yaml"),
            r#"
branches:
  feature:
    pattern: '^feat/([A-Z]+-\d+)-(.+)$'
  release:
    pattern: '^release/(\d+\.\d+\.\d+)$'
    base: develop
    targets: [main, develop]
    version_bump: minor
"#,
        );

        let resolved = hermetic(dir.path()).with_team_config(&team).resolve()?;
        let doc = &resolved.document;

        let feature = doc.branch_type("feature").unwrap();
        assert_eq!(feature.pattern, r"^feat/([A-Z]+-\d+)-(.+)$");
        assert_eq!(feature.base, "develop");
        assert_eq!(doc.branch_type("docs").unwrap().pattern, r"^docs/(.+)$");
        assert_eq!(doc.branch_type("release").unwrap().version_bump, VersionBump::Minor);

        let keys: Vec<&str> = doc.branch_types.keys().collect();
        assert_eq!(keys, vec!["feature", "docs", "release"]);
        assert_eq!(
            resolved.provenance.fields["branches"],
            vec![FieldOrigin::Team, FieldOrigin::Project]
        );
        Ok(())
    }

    #[test]
    fn version_files_are_replaced_wholesale() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let team = dir.path().join("team.yaml");
        write(&team, TEAM);
        write(
            &dir.path().join(".practices.yaml"),
            "version:\n  files:\n    - path: VERSION\n      pattern: '(\\d+\\.\\d+\\.\\d+)'\n",
        );

        let doc = hermetic(dir.path()).with_team_config(&team).resolve()?.document;
        let paths: Vec<&str> = doc.version_files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["VERSION"]);
        Ok(())
    }

    #[test]
    fn version_file_without_pattern_is_a_schema_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        write(
            &dir.path().join(".practices.yaml"),
            "branching_strategy: trunk\nversion:\n  files:\n    - path: VERSION\n",
        );

        let err = hermetic(dir.path()).resolve().unwrap_err();
        match err {
            ConfigError::Schema(e) => assert!(e.mentions("version.files[0].pattern")),
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn other_version_keys_merge_per_key() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let team = dir.path().join("team.yaml");
        write(
            &team,
            "branching_strategy: trunk\nversion:\n  use_bumpversion: true\n  tag_prefix: v\n",
        );
        write(
            &dir.path().join(".practices.yaml"),
            "version:\n  tag_prefix: release-\n",
        );

        let doc = hermetic(dir.path()).with_team_config(&team).resolve()?.document;
        let extra = &doc.version_extra;
        assert_eq!(
            extra.get("use_bumpversion").and_then(serde_yaml::Value::as_bool),
            Some(true)
        );
        assert_eq!(
            extra.get("tag_prefix").and_then(serde_yaml::Value::as_str),
            Some("release-")
        );
        Ok(())
    }

    #[test]
    fn integrations_merge_per_key() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let team = dir.path().join("team.yaml");
        write(&team, TEAM);
        write(
            &dir.path().join(".practices.yaml"),
            "jira:\n  project_key: PMS\ngithub:\n  owner: acme\n  repo: widgets\n",
        );

        let doc = hermetic(dir.path()).with_team_config(&team).resolve()?.document;
        let jira = doc.integrations.jira.unwrap();
        assert_eq!(jira.get("project_key").and_then(Value::as_str), Some("PMS"));
        assert_eq!(
            jira.get("url").and_then(Value::as_str),
            Some("https://jira.example.com")
        );
        assert!(doc.integrations.github.is_some());
        Ok(())
    }

    #[test]
    fn no_layers_synthesizes_defaults_from_detection() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().join("my-service");
        fs::create_dir(&root)?;
        write(&root.join("pyproject.toml"), "[project]\nversion = \"0.1.0\"\n");

        let resolved = hermetic(&root).resolve()?;
        let detection = resolved.provenance.synthesized.as_ref().unwrap();
        assert_eq!(detection.project_type, ProjectType::Python);
        assert_eq!(detection.confidence, Confidence::High);

        let doc = &resolved.document;
        assert_eq!(doc.branching_strategy, BranchingStrategy::Gitflow);
        assert_eq!(doc.develop_branch.as_deref(), Some("develop"));
        assert_eq!(doc.version_files[0].path, "src/my_service/__init__.py");
        assert_eq!(resolved.provenance.origin("branches"), Some(FieldOrigin::Synthesized));
        Ok(())
    }

    #[test]
    fn unparseable_layer_is_a_parse_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        write(&dir.path().join(".practices.yaml"), "branches: [oops\n");

        let err = hermetic(dir.path()).resolve().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Parse {
                layer: ConfigLayer::Project,
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn wrong_shape_is_a_parse_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        write(&dir.path().join(".practices.yaml"), "branches:\n  - feature\n");

        let err = hermetic(dir.path()).resolve().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        Ok(())
    }

    #[test]
    fn empty_project_document_is_an_empty_layer() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        write(&dir.path().join(".practices.yaml"), "# nothing yet\n");

        // The layer exists, so nothing is synthesized and gitflow needs develop.
        let err = hermetic(dir.path()).resolve().unwrap_err();
        match err {
            ConfigError::Schema(e) => assert!(e.mentions("develop_branch")),
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn ancestor_documents_form_the_team_layer() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let org = dir.path().join("org");
        let project = org.join("group").join("project");
        fs::create_dir_all(&project)?;
        write(
            &org.join(".practices.yaml"),
            "branching_strategy: trunk\nworkflow_mode: team\n",
        );
        write(
            &org.join("group").join(".practices.yml"),
            "workflow_mode: solo\n",
        );

        let resolved = ConfigLoader::new(&project)
            .without_global_user_config()
            .resolve()?;
        assert_eq!(resolved.document.branching_strategy, BranchingStrategy::Trunk);
        assert_eq!(resolved.document.workflow_mode, WorkflowMode::Solo);
        assert_eq!(resolved.provenance.layers[0].paths.len(), 2);
        Ok(())
    }

    #[test]
    fn yml_extension_is_accepted() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        write(&dir.path().join(".practices.yml"), "branching_strategy: trunk\n");

        let loader = hermetic(dir.path());
        assert!(loader.project_document().is_some());
        assert_eq!(
            loader.resolve()?.document.branching_strategy,
            BranchingStrategy::Trunk
        );
        Ok(())
    }

    #[test]
    fn unknown_blocks_pass_through_and_replace_wholesale() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let team = dir.path().join("team.yaml");
        write(&team, "branching_strategy: trunk\npre_commit:\n  hooks: [fmt, lint]\n");
        write(
            &dir.path().join(".practices.yaml"),
            "pre_commit:\n  hooks: [fmt]\n",
        );

        let resolved = hermetic(dir.path()).with_team_config(&team).resolve()?;
        let hooks = resolved.document.extra["pre_commit"]["hooks"]
            .as_sequence()
            .unwrap()
            .len();
        assert_eq!(hooks, 1);
        assert_eq!(resolved.provenance.origin("pre_commit"), Some(FieldOrigin::Project));
        Ok(())
    }

    #[test]
    fn resolution_reads_disk_every_time() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let doc = dir.path().join(".practices.yaml");
        write(&doc, "branching_strategy: trunk\nmain_branch: main\n");
        let loader = hermetic(dir.path());
        assert_eq!(loader.resolve()?.document.main_branch, "main");

        write(&doc, "branching_strategy: trunk\nmain_branch: master\n");
        assert_eq!(loader.resolve()?.document.main_branch, "master");
        Ok(())
    }
}
