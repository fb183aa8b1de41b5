//! Branch name validation and construction.
//!
//! Validation tests a name against each configured branch type in
//! definition order; the first match wins. Construction goes the other way,
//! composing a name from a conventional template and then validating it to
//! make sure the configured pattern accepts it.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::schema::{ConfigurationDocument, IDENTIFIER_BRANCH_TYPES};
use crate::pattern::{Capture, Pattern, PatternCompileError, PatternMatch};

/// Result of checking a branch name against the configured branch types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchValidation {
    /// Whether some branch type accepted the name.
    pub valid: bool,
    /// Name of the matching branch type.
    pub branch_type: Option<String>,
    /// Ticket key or version carried by the name.
    pub identifier: Option<String>,
    /// Free-text part of the name.
    pub description: Option<String>,
    /// Base branch of the matching type.
    pub base: Option<String>,
    /// Merge targets of the matching type.
    pub targets: Vec<String>,
    /// Why the name was rejected.
    pub errors: Vec<String>,
}

/// A constructed branch name plus where it branches from and merges into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchPlan {
    /// The branch name.
    pub name: String,
    /// Branch to create it from.
    pub base: String,
    /// Branches to merge it into when done.
    pub targets: Vec<String>,
}

/// Branch name construction failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BranchError {
    /// The branch type is not configured.
    #[error("unknown branch type '{branch_type}' (configured: {})", known.join(", "))]
    UnknownType {
        /// Requested type.
        branch_type: String,
        /// Configured types, in definition order.
        known: Vec<String>,
    },

    /// The type needs an identifier and none was given.
    #[error("branch type '{branch_type}' requires an identifier")]
    MissingIdentifier {
        /// Requested type.
        branch_type: String,
    },

    /// The type needs a description and none was given.
    #[error("branch type '{branch_type}' requires a description")]
    MissingDescription {
        /// Requested type.
        branch_type: String,
    },

    /// The configured pattern does not compile.
    #[error(transparent)]
    Pattern(#[from] PatternCompileError),

    /// The composed name does not validate back to the requested parts.
    #[error("constructed branch name '{name}' does not satisfy the '{branch_type}' pattern: {reason}")]
    RoundTrip {
        /// Composed name.
        name: String,
        /// Requested type.
        branch_type: String,
        /// What went wrong when re-validating.
        reason: String,
    },
}

/// Checks `name` against the document's branch types.
pub fn validate_branch(name: &str, doc: &ConfigurationDocument) -> BranchValidation {
    let name = name.trim();
    if name.is_empty() {
        return rejected(vec!["branch name is empty".to_string()]);
    }
    if doc.branch_types.is_empty() {
        return rejected(vec![format!(
            "branch '{name}' cannot be validated: no branch types are configured"
        )]);
    }

    let mut candidates = Vec::new();
    for (branch_type, rule) in doc.branch_types.iter() {
        let field = format!("branches.{branch_type}.pattern");
        let pattern = match Pattern::compile(field, &rule.pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                candidates.push(format!("  {branch_type}: {e}"));
                continue;
            }
        };

        let Some(found) = pattern.captures(name) else {
            candidates.push(format!("  {branch_type}: {}", rule.pattern));
            continue;
        };

        let (identifier, description) = extract_parts(branch_type, &pattern, &found);
        debug!(branch = name, %branch_type, "Branch name matched");
        return BranchValidation {
            valid: true,
            branch_type: Some(branch_type.to_string()),
            identifier,
            description,
            base: Some(rule.base.clone()),
            targets: rule.targets.clone(),
            errors: Vec::new(),
        };
    }

    let mut errors = vec![format!(
        "branch '{name}' does not match any configured branch type; tried:"
    )];
    errors.extend(candidates);
    rejected(errors)
}

fn rejected(errors: Vec<String>) -> BranchValidation {
    BranchValidation {
        errors,
        ..BranchValidation::default()
    }
}

/// Splits captures into identifier and description.
///
/// Named `identifier`/`description` groups win. Otherwise two or more groups
/// mean (identifier, description), and a single group is the identifier for
/// identifier-bearing types and the description for everything else.
fn extract_parts(
    branch_type: &str,
    pattern: &Pattern,
    found: &PatternMatch,
) -> (Option<String>, Option<String>) {
    let text = |c: Option<&Capture>| c.map(|c| c.text.clone());

    if pattern.has_group("identifier") || pattern.has_group("description") {
        return (
            text(found.named("identifier")),
            text(found.named("description")),
        );
    }

    match pattern.group_count() {
        0 => (None, None),
        1 if IDENTIFIER_BRANCH_TYPES.contains(&branch_type) => (text(found.group(1)), None),
        1 => (None, text(found.group(1))),
        _ => (text(found.group(1)), text(found.group(2))),
    }
}

/// Lowercases and replaces every run of non-alphanumeric characters with `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Composes a branch name for `branch_type` and verifies it validates back.
///
/// Identifier-bearing types produce `{type}/{identifier}-{slug}` (or
/// `{type}/{identifier}` when the pattern allows no description); other
/// types produce `{type}/{slug}`, folding any identifier into the slug.
pub fn construct_branch(
    doc: &ConfigurationDocument,
    branch_type: &str,
    identifier: Option<&str>,
    description: Option<&str>,
) -> Result<BranchPlan, BranchError> {
    let rule = doc
        .branch_type(branch_type)
        .ok_or_else(|| BranchError::UnknownType {
            branch_type: branch_type.to_string(),
            known: doc.branch_types.keys().map(str::to_string).collect(),
        })?;
    let pattern = Pattern::compile(format!("branches.{branch_type}.pattern"), &rule.pattern)?;

    let identifier = identifier.map(str::trim).filter(|i| !i.is_empty());
    let bears_identifier =
        IDENTIFIER_BRANCH_TYPES.contains(&branch_type) || pattern.group_count() >= 2;

    let (name, expected) = if bears_identifier {
        let identifier = identifier.ok_or_else(|| BranchError::MissingIdentifier {
            branch_type: branch_type.to_string(),
        })?;
        let slug = slugify(description.unwrap_or_default());
        if slug.is_empty() {
            let bare = format!("{branch_type}/{identifier}");
            if !pattern.is_match(&bare) {
                return Err(BranchError::MissingDescription {
                    branch_type: branch_type.to_string(),
                });
            }
            (bare, Expected::new(Some(identifier), None))
        } else {
            let name = format!("{branch_type}/{identifier}-{slug}");
            (name, Expected::new(Some(identifier), Some(slug)))
        }
    } else {
        let words: Vec<&str> = identifier.into_iter().chain(description).collect();
        let slug = slugify(&words.join(" "));
        if slug.is_empty() {
            return Err(BranchError::MissingDescription {
                branch_type: branch_type.to_string(),
            });
        }
        (format!("{branch_type}/{slug}"), Expected::new(None, Some(slug)))
    };

    verify_round_trip(doc, branch_type, &name, &expected)?;

    Ok(BranchPlan {
        name,
        base: rule.base.clone(),
        targets: rule.targets.clone(),
    })
}

/// Parts a constructed name must read back as.
struct Expected {
    identifier: Option<String>,
    description: Option<String>,
}

impl Expected {
    fn new(identifier: Option<&str>, description: Option<String>) -> Self {
        Self {
            identifier: identifier.map(str::to_string),
            description,
        }
    }
}

fn verify_round_trip(
    doc: &ConfigurationDocument,
    branch_type: &str,
    name: &str,
    expected: &Expected,
) -> Result<(), BranchError> {
    let check = validate_branch(name, doc);
    let failure = |reason: String| BranchError::RoundTrip {
        name: name.to_string(),
        branch_type: branch_type.to_string(),
        reason,
    };

    if !check.valid {
        return Err(failure("no branch type accepts it".to_string()));
    }
    if check.branch_type.as_deref() != Some(branch_type) {
        return Err(failure(format!(
            "it matches branch type '{}' first",
            check.branch_type.unwrap_or_default()
        )));
    }
    if expected.identifier.is_some() && check.identifier != expected.identifier {
        return Err(failure(format!(
            "the identifier reads back as '{}'",
            check.identifier.unwrap_or_default()
        )));
    }
    if expected.description.is_some() && check.description != expected.description {
        return Err(failure(format!(
            "the description reads back as '{}'",
            check.description.unwrap_or_default()
        )));
    }
    Ok(())
}
