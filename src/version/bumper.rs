//! Rewrites the version in every configured file.
//!
//! A bump refuses to start unless all files agree. Every file is read and
//! located before the first write, so unreadable or unmatched files abort
//! with nothing changed. Only the captured span is replaced.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::checker::{check_versions, locate, LocatedVersion};
use super::semver::{SemanticVersion, VersionPart};
use super::VersionError;
use crate::config::schema::ConfigurationDocument;
use crate::utils::fs::write_atomic;

/// Bump request.
#[derive(Debug, Clone, Copy)]
pub struct BumpOptions {
    /// Component to increment.
    pub part: VersionPart,
    /// Compute the changes without writing anything.
    pub dry_run: bool,
}

/// Version change in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Path relative to the project root.
    pub path: String,
    /// Version before the bump.
    pub previous: String,
    /// Version after the bump.
    pub new: String,
}

/// What a bump did, or would do for a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BumpOutcome {
    /// Version all files agreed on.
    pub previous_version: String,
    /// Version written.
    pub new_version: String,
    /// Component that was incremented.
    pub part: VersionPart,
    /// Whether files were left untouched.
    pub dry_run: bool,
    /// Files rewritten (or that would be), each listed once.
    pub files_updated: Vec<String>,
    /// Per-file changes.
    pub changes: Vec<FileChange>,
}

/// One file's pending rewrite.
struct PendingFile {
    path: String,
    content: String,
    spans: Vec<(usize, usize)>,
}

impl PendingFile {
    fn rewritten(&self, version: &str) -> String {
        let mut spans = self.spans.clone();
        spans.sort_unstable();
        spans.dedup();

        let mut content = self.content.clone();
        // Back to front so earlier offsets stay valid.
        for (start, end) in spans.into_iter().rev() {
            content.replace_range(start..end, version);
        }
        content
    }
}

fn group_by_file(located: Vec<LocatedVersion>) -> Vec<PendingFile> {
    let mut pending: Vec<PendingFile> = Vec::new();
    for item in located {
        let span = (item.start, item.end);
        match pending.iter_mut().find(|p| p.path == item.path) {
            Some(file) => file.spans.push(span),
            None => pending.push(PendingFile {
                path: item.path,
                content: item.content,
                spans: vec![span],
            }),
        }
    }
    pending
}

/// Increments the shared version in every configured file.
pub fn bump_version(
    doc: &ConfigurationDocument,
    root: &Path,
    options: BumpOptions,
) -> Result<BumpOutcome, VersionError> {
    if doc.version_files.is_empty() {
        return Err(VersionError::NoVersionFiles);
    }

    let report = check_versions(doc, root);
    let Some(current) = report.version.clone().filter(|_| report.consistent) else {
        return Err(VersionError::Inconsistent {
            report: Box::new(report),
        });
    };

    let previous: SemanticVersion = current.parse()?;
    let next = previous.bump(options.part)?.to_string();

    let located = doc
        .version_files
        .iter()
        .enumerate()
        .map(|(index, rule)| locate(root, index, rule))
        .collect::<Result<Vec<_>, _>>()?;

    let changes: Vec<FileChange> = located
        .iter()
        .map(|l| FileChange {
            path: l.path.clone(),
            previous: l.version().to_string(),
            new: next.clone(),
        })
        .fold(Vec::new(), |mut acc, change| {
            if !acc.iter().any(|c: &FileChange| c.path == change.path) {
                acc.push(change);
            }
            acc
        });

    let pending = group_by_file(located);
    let files_updated: Vec<String> = pending.iter().map(|p| p.path.clone()).collect();

    if options.dry_run {
        debug!(from = %current, to = %next, files = files_updated.len(), "Dry run; not writing");
    } else {
        write_all(root, &pending, &next)?;
        info!(from = %current, to = %next, files = files_updated.len(), "Bumped version");
    }

    Ok(BumpOutcome {
        previous_version: current,
        new_version: next,
        part: options.part,
        dry_run: options.dry_run,
        files_updated,
        changes,
    })
}

fn write_all(root: &Path, pending: &[PendingFile], version: &str) -> Result<(), VersionError> {
    let mut updated: Vec<String> = Vec::new();
    for file in pending {
        let content = file.rewritten(version);
        if let Err(source) = write_atomic(&root.join(&file.path), content.as_bytes()) {
            return Err(if updated.is_empty() {
                VersionError::Write {
                    path: file.path.clone(),
                    source,
                }
            } else {
                VersionError::PartialWrite {
                    updated,
                    failed: file.path.clone(),
                    source,
                }
            });
        }
        debug!(path = %file.path, %version, "Updated version file");
        updated.push(file.path.clone());
    }
    Ok(())
}
