//! Typed configuration document and its sparse per-layer variant.
//!
//! A layer file deserializes into [`PartialConfig`], where every field is
//! optional and enum-valued fields are still plain strings. Layers are merged
//! at that level, and [`validate`] turns the merged result into a
//! [`ConfigurationDocument`] or a list of field-level errors.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Mapping;
use thiserror::Error;

use crate::pattern::Pattern;

/// Branch types whose names carry an identifier (ticket key or version).
pub const IDENTIFIER_BRANCH_TYPES: [&str; 4] = ["feature", "bugfix", "release", "hotfix"];

/// Project language or ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Python (pip, poetry, setuptools).
    Python,
    /// JavaScript (npm, yarn).
    Javascript,
    /// TypeScript.
    Typescript,
    /// Java (Maven, Gradle).
    Java,
    /// C# (.NET).
    Csharp,
    /// Go modules.
    Go,
    /// Rust (Cargo).
    Rust,
    /// Anything else.
    #[default]
    Generic,
}

impl ProjectType {
    /// Every project type, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Python,
        Self::Javascript,
        Self::Typescript,
        Self::Java,
        Self::Csharp,
        Self::Go,
        Self::Rust,
        Self::Generic,
    ];

    /// Name as written in configuration documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Java => "java",
            Self::Csharp => "csharp",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Generic => "generic",
        }
    }
}

/// Branching model the project follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BranchingStrategy {
    /// Long-lived main and develop branches with feature/release/hotfix branches.
    #[default]
    #[serde(rename = "gitflow")]
    Gitflow,
    /// Short-lived branches off main.
    #[serde(rename = "github-flow")]
    GithubFlow,
    /// Trunk-based development.
    #[serde(rename = "trunk")]
    Trunk,
}

impl BranchingStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 3] = [Self::Gitflow, Self::GithubFlow, Self::Trunk];

    /// Name as written in configuration documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gitflow => "gitflow",
            Self::GithubFlow => "github-flow",
            Self::Trunk => "trunk",
        }
    }
}

/// Whether merges go through a review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowMode {
    /// Single developer, direct merges.
    #[default]
    Solo,
    /// Merges go through pull-request review.
    Team,
}

impl WorkflowMode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 2] = [Self::Solo, Self::Team];

    /// Name as written in configuration documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Team => "team",
        }
    }
}

/// Version increment implied by finishing a branch type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    /// No version change.
    #[default]
    None,
    /// Breaking release.
    Major,
    /// Feature release.
    Minor,
    /// Fix release.
    Patch,
}

impl VersionBump {
    /// Every bump kind, in declaration order.
    pub const ALL: [Self; 4] = [Self::None, Self::Major, Self::Minor, Self::Patch];

    /// Name as written in configuration documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }
}

/// Implements `Display` and a case-insensitive `FromStr` over `ALL`/`as_str`.
macro_rules! document_enum {
    ($($ty:ty),+ $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| {
                        let expected: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        format!("unknown value `{s}`, expected one of: {}", expected.join(", "))
                    })
            }
        }
    )+};
}

document_enum!(ProjectType, BranchingStrategy, WorkflowMode, VersionBump);

/// Insertion-ordered string-keyed map that rejects duplicate keys on input.
///
/// Branch types are matched in the order they were defined, so the map must
/// keep document order through parsing and merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Looks up `key` mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or replaces; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Iterates entries in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates keys in definition order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of names to entries")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrderedMap::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    if map.contains_key(&key) {
                        return Err(serde::de::Error::custom(format!("duplicate key `{key}`")));
                    }
                    map.entries.push((key, value));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Naming and merge rule for one branch type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTypeRule {
    /// Regular expression a branch name of this type must match.
    pub pattern: String,
    /// Branch to create from and merge back into.
    pub base: String,
    /// Branches to merge into on completion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    /// Version increment implied by the branch type.
    #[serde(default)]
    pub version_bump: VersionBump,
}

/// A file that embeds the project version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFileRule {
    /// Path relative to the project root.
    pub path: String,
    /// Regular expression with exactly one capture group spanning the version.
    pub pattern: String,
}

/// Issue-tracker and code-host blocks, carried without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Integrations {
    /// `jira` block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jira: Option<Mapping>,
    /// `github` block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<Mapping>,
}

/// Resolved, validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationDocument {
    /// Project language or ecosystem.
    pub project_type: ProjectType,
    /// Branching model.
    pub branching_strategy: BranchingStrategy,
    /// Review workflow.
    pub workflow_mode: WorkflowMode,
    /// Production branch.
    pub main_branch: String,
    /// Integration branch; always set for gitflow.
    pub develop_branch: Option<String>,
    /// Branch-type rules in definition order.
    pub branch_types: OrderedMap<BranchTypeRule>,
    /// Files that embed the version, in document order.
    pub version_files: Vec<VersionFileRule>,
    /// Changelog path relative to the project root.
    pub changelog: Option<String>,
    /// Other keys of the `version` block, carried unmodified.
    pub version_extra: Mapping,
    /// Pass-through integration blocks.
    pub integrations: Integrations,
    /// Other top-level blocks, carried unmodified.
    pub extra: Mapping,
}

impl ConfigurationDocument {
    /// Looks up a branch-type rule by name.
    pub fn branch_type(&self, name: &str) -> Option<&BranchTypeRule> {
        self.branch_types.get(name)
    }

    /// Converts back into the sparse form, e.g. for writing a document to disk.
    pub fn to_partial(&self) -> PartialConfig {
        PartialConfig {
            project_type: Some(self.project_type.to_string()),
            branching_strategy: Some(self.branching_strategy.to_string()),
            workflow_mode: Some(self.workflow_mode.to_string()),
            main_branch: Some(self.main_branch.clone()),
            develop_branch: self.develop_branch.clone(),
            branches: Some(
                self.branch_types
                    .iter()
                    .map(|(name, rule)| {
                        let partial = PartialBranchTypeRule {
                            pattern: Some(rule.pattern.clone()),
                            base: Some(rule.base.clone()),
                            targets: (!rule.targets.is_empty()).then(|| rule.targets.clone()),
                            version_bump: Some(rule.version_bump.to_string()),
                        };
                        (name.to_string(), partial)
                    })
                    .collect(),
            ),
            version: (!self.version_files.is_empty()
                || self.changelog.is_some()
                || !self.version_extra.is_empty())
            .then(|| PartialVersionSettings {
                files: Some(self.version_files.iter().cloned().map(Into::into).collect()),
                changelog: self.changelog.clone(),
                extra: self.version_extra.clone(),
            }),
            jira: self.integrations.jira.clone(),
            github: self.integrations.github.clone(),
            extra: self.extra.clone(),
        }
    }
}

impl Serialize for ConfigurationDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_partial().serialize(serializer)
    }
}

/// Sparse branch-type rule as written in one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialBranchTypeRule {
    /// Branch-name pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Base branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Merge targets; `target` is accepted as an alias.
    #[serde(default, alias = "target", skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
    /// Version bump kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_bump: Option<String>,
}

/// Sparse version-file entry as written in one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialVersionFileRule {
    /// Path relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Version pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl From<VersionFileRule> for PartialVersionFileRule {
    fn from(rule: VersionFileRule) -> Self {
        Self {
            path: Some(rule.path),
            pattern: Some(rule.pattern),
        }
    }
}

/// Sparse `version` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialVersionSettings {
    /// Version files; replaced wholesale when a layer defines them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<PartialVersionFileRule>>,
    /// Changelog path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    /// Other keys in the block, e.g. `use_bumpversion`.
    #[serde(flatten)]
    pub extra: Mapping,
}

impl PartialVersionSettings {
    /// A block listing only `files`.
    pub fn from_files(files: impl IntoIterator<Item = VersionFileRule>) -> Self {
        Self {
            files: Some(files.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }
}

/// One layer's configuration: every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialConfig {
    /// `project_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    /// `branching_strategy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branching_strategy: Option<String>,
    /// `workflow_mode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_mode: Option<String>,
    /// `main_branch`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_branch: Option<String>,
    /// `develop_branch`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub develop_branch: Option<String>,
    /// `branches`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<OrderedMap<PartialBranchTypeRule>>,
    /// `version`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PartialVersionSettings>,
    /// `jira`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira: Option<Mapping>,
    /// `github`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<Mapping>,
    /// Any other top-level block.
    #[serde(flatten)]
    pub extra: Mapping,
}

impl PartialConfig {
    /// Whether the layer sets nothing at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One field-level schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `branches.feature.pattern`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The merged document does not satisfy the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("configuration failed schema validation: {}", join_errors(.errors))]
pub struct SchemaValidationError {
    /// Every violation found, in field order.
    pub errors: Vec<FieldError>,
}

impl SchemaValidationError {
    /// Whether any violation concerns `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates a merged partial document into a typed one.
///
/// Collects every violation instead of stopping at the first.
pub fn validate(partial: &PartialConfig) -> Result<ConfigurationDocument, SchemaValidationError> {
    let mut errors = Vec::new();

    let project_type: ProjectType =
        parse_enum(&mut errors, "project_type", partial.project_type.as_deref());
    let branching_strategy: BranchingStrategy = parse_enum(
        &mut errors,
        "branching_strategy",
        partial.branching_strategy.as_deref(),
    );
    let workflow_mode: WorkflowMode =
        parse_enum(&mut errors, "workflow_mode", partial.workflow_mode.as_deref());

    let main_branch = partial
        .main_branch
        .clone()
        .unwrap_or_else(|| "main".to_string());
    if main_branch.trim().is_empty() {
        errors.push(FieldError::new("main_branch", "must not be empty"));
    }

    let develop_branch = partial
        .develop_branch
        .clone()
        .filter(|b| !b.trim().is_empty());
    if branching_strategy == BranchingStrategy::Gitflow && develop_branch.is_none() {
        errors.push(FieldError::new(
            "develop_branch",
            "required when branching_strategy is gitflow",
        ));
    }

    let mut branch_types = OrderedMap::new();
    if let Some(branches) = &partial.branches {
        for (name, rule) in branches.iter() {
            if let Some(rule) = validate_branch_rule(&mut errors, name, rule) {
                branch_types.insert(name, rule);
            }
        }
    }

    let mut version_files = Vec::new();
    let mut changelog = None;
    let mut version_extra = Mapping::new();
    if let Some(version) = &partial.version {
        for (index, rule) in version.files.iter().flatten().enumerate() {
            if let Some(rule) = validate_version_file(&mut errors, index, rule) {
                version_files.push(rule);
            }
        }
        changelog = version.changelog.clone().filter(|c| !c.trim().is_empty());
        version_extra = version.extra.clone();
    }

    if !errors.is_empty() {
        return Err(SchemaValidationError { errors });
    }

    Ok(ConfigurationDocument {
        project_type,
        branching_strategy,
        workflow_mode,
        main_branch,
        develop_branch,
        branch_types,
        version_files,
        changelog,
        version_extra,
        integrations: Integrations {
            jira: partial.jira.clone(),
            github: partial.github.clone(),
        },
        extra: partial.extra.clone(),
    })
}

fn parse_enum<T>(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>) -> T
where
    T: FromStr<Err = String> + Default,
{
    match value {
        None => T::default(),
        Some(raw) => raw.parse().unwrap_or_else(|message| {
            errors.push(FieldError::new(field, message));
            T::default()
        }),
    }
}

fn validate_branch_rule(
    errors: &mut Vec<FieldError>,
    name: &str,
    rule: &PartialBranchTypeRule,
) -> Option<BranchTypeRule> {
    let prefix = format!("branches.{name}");
    let before = errors.len();

    if name.trim().is_empty() {
        errors.push(FieldError::new("branches", "branch type names must not be empty"));
    }

    match rule.pattern.as_deref() {
        None => errors.push(FieldError::new(format!("{prefix}.pattern"), "is required")),
        Some(source) => match Pattern::compile(format!("{prefix}.pattern"), source) {
            Ok(pattern) => {
                if IDENTIFIER_BRANCH_TYPES.contains(&name) && pattern.group_count() == 0 {
                    errors.push(FieldError::new(
                        pattern.field(),
                        "must contain at least one capture group for the identifier",
                    ));
                }
            }
            Err(e) => errors.push(FieldError::new(e.field, e.message)),
        },
    }

    if rule.base.is_none() {
        errors.push(FieldError::new(format!("{prefix}.base"), "is required"));
    }

    let version_bump: VersionBump = parse_enum(
        errors,
        &format!("{prefix}.version_bump"),
        rule.version_bump.as_deref(),
    );

    if errors.len() != before {
        return None;
    }

    Some(BranchTypeRule {
        pattern: rule.pattern.clone().unwrap_or_default(),
        base: rule.base.clone().unwrap_or_default(),
        targets: rule.targets.clone().unwrap_or_default(),
        version_bump,
    })
}

fn validate_version_file(
    errors: &mut Vec<FieldError>,
    index: usize,
    rule: &PartialVersionFileRule,
) -> Option<VersionFileRule> {
    let prefix = format!("version.files[{index}]");
    let before = errors.len();

    match rule.path.as_deref() {
        None => errors.push(FieldError::new(format!("{prefix}.path"), "is required")),
        Some(path) if path.trim().is_empty() => {
            errors.push(FieldError::new(format!("{prefix}.path"), "must not be empty"));
        }
        Some(_) => {}
    }

    let compiled = rule
        .pattern
        .as_deref()
        .map(|source| Pattern::compile(format!("{prefix}.pattern"), source));
    match compiled {
        None => errors.push(FieldError::new(format!("{prefix}.pattern"), "is required")),
        Some(Ok(pattern)) if pattern.group_count() != 1 => errors.push(FieldError::new(
            pattern.field(),
            format!(
                "must contain exactly one capture group spanning the version (found {}); \
                 use (?:...) for grouping",
                pattern.group_count()
            ),
        )),
        Some(Ok(_)) => {}
        Some(Err(e)) => errors.push(FieldError::new(e.field, e.message)),
    }

    if errors.len() != before {
        return None;
    }

    Some(VersionFileRule {
        path: rule.path.clone().unwrap_or_default(),
        pattern: rule.pattern.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> PartialConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    const GITFLOW: &str = r#"
project_type: python
branching_strategy: gitflow
workflow_mode: team
main_branch: main
develop_branch: develop
branches:
  feature:
    pattern: '^feature/([A-Z]+-\d+)-(.+)$'
    base: develop
  release:
    pattern: '^release/(\d+\.\d+\.\d+)$'
    base: develop
    target: [main, develop]
    version_bump: minor
  docs:
    pattern: '^docs/(.+)$'
    base: develop
version:
  files:
    - path: pyproject.toml
      pattern: 'version = "(\d+\.\d+\.\d+)"'
  changelog: CHANGELOG.md
jira:
  project_key: PMS
pull_requests:
  checks:
    run_tests: true
"#;

    #[test]
    fn valid_document_is_typed() {
        let doc = validate(&parse(GITFLOW)).unwrap();
        assert_eq!(doc.project_type, ProjectType::Python);
        assert_eq!(doc.branching_strategy, BranchingStrategy::Gitflow);
        assert_eq!(doc.workflow_mode, WorkflowMode::Team);
        assert_eq!(doc.develop_branch.as_deref(), Some("develop"));
        assert_eq!(doc.version_files.len(), 1);
        assert_eq!(doc.changelog.as_deref(), Some("CHANGELOG.md"));

        let release = doc.branch_type("release").unwrap();
        assert_eq!(release.targets, vec!["main", "develop"]);
        assert_eq!(release.version_bump, VersionBump::Minor);
        assert_eq!(doc.branch_type("docs").unwrap().version_bump, VersionBump::None);
    }

    #[test]
    fn branch_types_keep_definition_order() {
        let doc = validate(&parse(GITFLOW)).unwrap();
        let keys: Vec<&str> = doc.branch_types.keys().collect();
        assert_eq!(keys, vec!["feature", "release", "docs"]);
    }

    #[test]
    fn integrations_and_unknown_blocks_pass_through() {
        let doc = validate(&parse(GITFLOW)).unwrap();
        let jira = doc.integrations.jira.as_ref().unwrap();
        assert_eq!(
            jira.get("project_key").and_then(serde_yaml::Value::as_str),
            Some("PMS")
        );
        assert!(doc.extra.contains_key("pull_requests"));
    }

    #[test]
    fn gitflow_without_develop_branch_names_the_field() {
        let err = validate(&parse("branching_strategy: gitflow\nmain_branch: main\n")).unwrap_err();
        assert!(err.mentions("develop_branch"));
        assert!(err.to_string().contains("develop_branch"));
    }

    #[test]
    fn develop_branch_is_optional_outside_gitflow() {
        let doc = validate(&parse("branching_strategy: trunk\n")).unwrap();
        assert_eq!(doc.develop_branch, None);
        assert_eq!(doc.main_branch, "main");
    }

    #[test]
    fn defaults_apply_to_missing_scalars() {
        let doc = validate(&parse("develop_branch: develop\n")).unwrap();
        assert_eq!(doc.project_type, ProjectType::Generic);
        assert_eq!(doc.branching_strategy, BranchingStrategy::Gitflow);
        assert_eq!(doc.workflow_mode, WorkflowMode::Solo);
    }

    #[test]
    fn empty_branch_map_is_valid() {
        let doc = validate(&parse("branching_strategy: trunk\nbranches: {}\n")).unwrap();
        assert!(doc.branch_types.is_empty());
    }

    #[test]
    fn unknown_enum_value_is_a_field_error() {
        let err = validate(&parse("branching_strategy: waterfall\n")).unwrap_err();
        assert!(err.mentions("branching_strategy"));
        assert!(err.errors[0].message.contains("github-flow"));
    }

    #[test]
    fn enum_values_are_case_insensitive() {
        let doc = validate(&parse("branching_strategy: GitHub-Flow\nproject_type: Rust\n")).unwrap();
        assert_eq!(doc.branching_strategy, BranchingStrategy::GithubFlow);
        assert_eq!(doc.project_type, ProjectType::Rust);
    }

    #[test]
    fn invalid_branch_pattern_is_reported_per_field() {
        let yaml = r#"
branching_strategy: trunk
branches:
  feature:
    pattern: '^feature/(['
    base: main
"#;
        let err = validate(&parse(yaml)).unwrap_err();
        assert!(err.mentions("branches.feature.pattern"));
    }

    #[test]
    fn identifier_types_need_a_capture_group() {
        let yaml = r#"
branching_strategy: trunk
branches:
  hotfix:
    pattern: '^hotfix/.+$'
    base: main
  chore:
    pattern: '^chore/.+$'
    base: main
"#;
        let err = validate(&parse(yaml)).unwrap_err();
        assert!(err.mentions("branches.hotfix.pattern"));
        assert!(!err.mentions("branches.chore.pattern"));
    }

    #[test]
    fn missing_rule_fields_are_required() {
        let yaml = "branching_strategy: trunk\nbranches:\n  feature:\n    version_bump: sideways\n";
        let err = validate(&parse(yaml)).unwrap_err();
        assert!(err.mentions("branches.feature.pattern"));
        assert!(err.mentions("branches.feature.base"));
        assert!(err.mentions("branches.feature.version_bump"));
    }

    #[test]
    fn version_pattern_needs_exactly_one_group() {
        let yaml = r#"
branching_strategy: trunk
version:
  files:
    - path: Cargo.toml
      pattern: 'version = "\d+\.\d+\.\d+"'
    - path: VERSION
      pattern: '(\d+)\.(\d+)\.(\d+)'
    - path: package.json
      pattern: '"version": "(\d+\.\d+\.\d+(?:-[a-z.]+)?)"'
"#;
        let err = validate(&parse(yaml)).unwrap_err();
        assert!(err.mentions("version.files[0].pattern"));
        assert!(err.mentions("version.files[1].pattern"));
        assert!(!err.mentions("version.files[2].pattern"));
    }

    #[test]
    fn incomplete_version_file_is_a_field_error() {
        let yaml = "branching_strategy: trunk\nversion:\n  files:\n    - path: VERSION\n    - pattern: '(\\d+)'\n";
        let err = validate(&parse(yaml)).unwrap_err();
        assert!(err.mentions("version.files[0].pattern"));
        assert!(!err.mentions("version.files[0].path"));
        assert!(err.mentions("version.files[1].path"));
    }

    #[test]
    fn other_version_keys_are_carried() {
        let yaml = "branching_strategy: trunk\nversion:\n  use_bumpversion: true\n  changelog: CHANGES.md\n";
        let doc = validate(&parse(yaml)).unwrap();
        assert_eq!(
            doc.version_extra.get("use_bumpversion").and_then(serde_yaml::Value::as_bool),
            Some(true)
        );
        assert_eq!(doc.changelog.as_deref(), Some("CHANGES.md"));

        let again = validate(&parse(&serde_yaml::to_string(&doc).unwrap())).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn duplicate_branch_keys_are_rejected() {
        let yaml = "branches:\n  feature:\n    base: a\n  feature:\n    base: b\n";
        assert!(serde_yaml::from_str::<PartialConfig>(yaml).is_err());
    }

    #[test]
    fn document_round_trips_through_partial_form() {
        let doc = validate(&parse(GITFLOW)).unwrap();
        let yaml = serde_yaml::to_string(&doc).unwrap();
        let again = validate(&parse(&yaml)).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn ordered_map_replace_keeps_position() {
        let mut map: OrderedMap<u8> = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 3), Some(1));
        let entries: Vec<(&str, &u8)> = map.iter().collect();
        assert_eq!(entries, vec![("a", &3), ("b", &2)]);
    }
}
