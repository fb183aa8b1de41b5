//! Reads the version out of every configured file and compares them.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::VersionError;
use crate::config::schema::{ConfigurationDocument, VersionFileRule};
use crate::pattern::Pattern;

/// Version found in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileVersion {
    /// Path relative to the project root.
    pub path: String,
    /// Extracted version, if the file was readable and matched.
    pub version: Option<String>,
    /// Whether this file agrees with the prevailing version.
    pub consistent: bool,
}

/// Result of comparing versions across files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionReport {
    /// Every file matched and all versions are identical.
    pub consistent: bool,
    /// The shared version, only when consistent.
    pub version: Option<String>,
    /// Per-rule breakdown in configuration order.
    pub files: Vec<FileVersion>,
    /// Missing files, non-matching patterns, and divergent values.
    pub errors: Vec<String>,
}

impl VersionReport {
    /// One-line description of why the report is not consistent.
    pub fn summary(&self) -> String {
        if self.consistent {
            return format!(
                "all files agree on {}",
                self.version.as_deref().unwrap_or_default()
            );
        }
        if self.errors.is_empty() {
            return "version files are inconsistent".to_string();
        }
        self.errors.join("; ")
    }

    /// Files whose value differs from the prevailing version.
    pub fn divergent(&self) -> impl Iterator<Item = &FileVersion> {
        self.files
            .iter()
            .filter(|f| f.version.is_some() && !f.consistent)
    }
}

/// A version located inside a file.
#[derive(Debug, Clone)]
pub(crate) struct LocatedVersion {
    pub(crate) path: String,
    pub(crate) content: String,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl LocatedVersion {
    pub(crate) fn version(&self) -> &str {
        &self.content[self.start..self.end]
    }
}

/// Reads `rule.path` under `root` and finds the first match's capture span.
pub(crate) fn locate(
    root: &Path,
    index: usize,
    rule: &VersionFileRule,
) -> Result<LocatedVersion, VersionError> {
    let pattern = Pattern::compile(format!("version.files[{index}].pattern"), &rule.pattern)?;
    let content = fs::read_to_string(root.join(&rule.path)).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            VersionError::FileNotFound {
                path: rule.path.clone(),
            }
        } else {
            VersionError::Read {
                path: rule.path.clone(),
                source,
            }
        }
    })?;

    let group = pattern
        .captures(&content)
        .and_then(|m| m.group(1).map(|c| (c.start, c.end)));
    let Some((start, end)) = group else {
        return Err(VersionError::NoMatch {
            path: rule.path.clone(),
            pattern: rule.pattern.clone(),
        });
    };

    Ok(LocatedVersion {
        path: rule.path.clone(),
        content,
        start,
        end,
    })
}

/// Most common value; ties go to the value seen first.
fn prevailing<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value)
}

/// Extracts the version from every configured file and compares them.
pub fn check_versions(doc: &ConfigurationDocument, root: &Path) -> VersionReport {
    let mut report = VersionReport::default();
    if doc.version_files.is_empty() {
        report.errors.push(VersionError::NoVersionFiles.to_string());
        return report;
    }

    let mut found: Vec<Option<String>> = Vec::with_capacity(doc.version_files.len());
    for (index, rule) in doc.version_files.iter().enumerate() {
        match locate(root, index, rule) {
            Ok(located) => {
                debug!(path = %rule.path, version = located.version(), "Found version");
                found.push(Some(located.version().to_string()));
            }
            Err(e) => {
                report.errors.push(e.to_string());
                found.push(None);
            }
        }
    }

    let expected = prevailing(found.iter().flatten().map(String::as_str)).map(str::to_string);
    for (rule, version) in doc.version_files.iter().zip(found) {
        let consistent = version.is_some() && version == expected;
        if let (Some(version), Some(expected), false) = (&version, &expected, consistent) {
            report.errors.push(format!(
                "version file '{}' has version {version}, expected {expected}",
                rule.path
            ));
        }
        report.files.push(FileVersion {
            path: rule.path.clone(),
            version,
            consistent,
        });
    }

    report.consistent = report.errors.is_empty() && report.files.iter().all(|f| f.consistent);
    if report.consistent {
        report.version = expected;
    }
    report
}
