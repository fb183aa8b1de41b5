//! Semantic checks on a resolved configuration.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::schema::{BranchingStrategy, ConfigurationDocument, IDENTIFIER_BRANCH_TYPES};
use crate::pattern::Pattern;

/// Outcome of validating a resolved document against a project directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// No errors and no missing files.
    pub valid: bool,
    /// Problems that make the configuration unusable.
    pub errors: Vec<String>,
    /// Configured version files that do not exist.
    pub missing_files: Vec<String>,
    /// Deviations from strategy conventions; never affect `valid`.
    pub warnings: Vec<String>,
}

/// Branch types each strategy conventionally defines.
fn expected_branch_types(strategy: BranchingStrategy) -> &'static [&'static str] {
    match strategy {
        BranchingStrategy::Gitflow => &["feature", "bugfix", "release", "hotfix"],
        BranchingStrategy::GithubFlow | BranchingStrategy::Trunk => &["feature", "bugfix"],
    }
}

/// Checks `doc` against the project rooted at `root`. Never mutates anything.
pub fn validate(doc: &ConfigurationDocument, root: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    for rule in &doc.version_files {
        if !root.join(&rule.path).is_file() {
            report.missing_files.push(rule.path.clone());
        }
    }

    for (name, rule) in doc.branch_types.iter() {
        match Pattern::compile(format!("branches.{name}.pattern"), &rule.pattern) {
            Ok(pattern) => {
                if IDENTIFIER_BRANCH_TYPES.contains(&name) && pattern.group_count() == 0 {
                    report.errors.push(format!(
                        "branch type '{name}' pattern has no capture group for the identifier"
                    ));
                }
            }
            Err(e) => report.errors.push(e.to_string()),
        }
    }

    for (index, rule) in doc.version_files.iter().enumerate() {
        match Pattern::compile(format!("version.files[{index}].pattern"), &rule.pattern) {
            Ok(pattern) if pattern.group_count() != 1 => report.errors.push(format!(
                "version file '{}' pattern must have exactly one capture group, found {}",
                rule.path,
                pattern.group_count()
            )),
            Ok(_) => {}
            Err(e) => report.errors.push(e.to_string()),
        }
    }

    let develop = doc
        .develop_branch
        .as_deref()
        .filter(|b| !b.trim().is_empty());
    if doc.branching_strategy == BranchingStrategy::Gitflow && develop.is_none() {
        report
            .errors
            .push("develop_branch is required for the gitflow strategy".to_string());
    }

    for (name, rule) in doc.branch_types.iter() {
        if rule.base.trim().is_empty() {
            report
                .errors
                .push(format!("branch type '{name}' has an empty base branch"));
        }
        if rule.targets.iter().any(|t| t.trim().is_empty()) {
            report
                .errors
                .push(format!("branch type '{name}' has an empty merge target"));
        }
    }

    check_conventions(doc, root, develop, &mut report);

    report.valid = report.errors.is_empty() && report.missing_files.is_empty();
    debug!(
        valid = report.valid,
        errors = report.errors.len(),
        missing = report.missing_files.len(),
        warnings = report.warnings.len(),
        "Validated configuration"
    );
    report
}

fn check_conventions(
    doc: &ConfigurationDocument,
    root: &Path,
    develop: Option<&str>,
    report: &mut ValidationReport,
) {
    for expected in expected_branch_types(doc.branching_strategy) {
        if !doc.branch_types.contains_key(expected) {
            report.warnings.push(format!(
                "{} strategy usually defines a '{expected}' branch type",
                doc.branching_strategy
            ));
        }
    }

    let known = |branch: &str| branch == doc.main_branch || Some(branch) == develop;
    for (name, rule) in doc.branch_types.iter() {
        let referenced = std::iter::once(&rule.base).chain(&rule.targets);
        for branch in referenced {
            if !branch.trim().is_empty() && !known(branch.as_str()) {
                report.warnings.push(format!(
                    "branch type '{name}' references '{branch}', which is neither main_branch nor develop_branch"
                ));
            }
        }
    }

    if let Some(changelog) = &doc.changelog {
        if !root.join(changelog).is_file() {
            report
                .warnings
                .push(format!("changelog '{changelog}' does not exist"));
        }
    }
}
