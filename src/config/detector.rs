//! Project type detection from a directory listing.
//!
//! Detection is advisory: it only seeds the default document when no
//! configuration exists at any layer.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use super::schema::ProjectType;

/// Directories never descended into while scanning.
const SKIPPED_DIRS: [&str; 9] = [
    ".git",
    "node_modules",
    "target",
    "venv",
    ".venv",
    "__pycache__",
    "dist",
    "build",
    "vendor",
];

/// How deep below the root the scan looks for source files.
const MAX_SCAN_DEPTH: usize = 6;

/// Evidence entries kept for extension-count matches.
const MAX_EVIDENCE: usize = 5;

/// How sure the detector is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Only a fallback applied.
    Low,
    /// Secondary indicators or source file counts matched.
    Medium,
    /// An ecosystem manifest is present.
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Outcome of detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    /// Inferred project type.
    pub project_type: ProjectType,
    /// Confidence of the inference.
    pub confidence: Confidence,
    /// Files or directories that satisfied the winning rule.
    pub evidence: Vec<String>,
}

/// Relative paths found under a project root, `/`-separated.
#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    files: Vec<String>,
    dirs: Vec<String>,
}

impl DirectoryListing {
    /// Builds a listing from known paths; entries ending in `/` are directories.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut listing = Self::default();
        for path in paths {
            let path = path.as_ref();
            match path.strip_suffix('/') {
                Some(dir) => listing.dirs.push(dir.to_string()),
                None => listing.files.push(path.to_string()),
            }
        }
        listing
    }

    /// Scans `root` recursively, skipping VCS, dependency and build directories.
    pub fn scan(root: &Path) -> io::Result<Self> {
        let mut listing = Self::default();
        listing.walk(root, "", 0)?;
        listing.files.sort();
        listing.dirs.sort();
        Ok(listing)
    }

    fn walk(&mut self, dir: &Path, prefix: &str, depth: usize) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };

            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if SKIPPED_DIRS.contains(&name.as_str()) {
                    continue;
                }
                self.dirs.push(relative.clone());
                if depth < MAX_SCAN_DEPTH {
                    self.descend(&entry.path(), &relative, depth + 1);
                }
            } else if file_type.is_file() {
                self.files.push(relative);
            }
        }
        Ok(())
    }

    /// Walks a subdirectory. An unreadable one is skipped, not fatal.
    fn descend(&mut self, dir: &Path, relative: &str, depth: usize) {
        if let Err(err) = self.walk(dir, relative, depth) {
            warn!(path = %relative, error = %err, "Skipping unreadable directory");
        }
    }

    fn root_file(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .map(String::as_str)
            .find(|f| *f == name)
    }

    fn root_file_with_extension(&self, ext: &str) -> Option<&str> {
        self.files
            .iter()
            .map(String::as_str)
            .find(|f| !f.contains('/') && extension(f) == Some(ext))
    }

    fn has_dir(&self, path: &str) -> bool {
        self.dirs.iter().any(|d| d == path)
    }

    fn files_with_extension<'a>(&'a self, ext: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.files
            .iter()
            .map(String::as_str)
            .filter(move |f| extension(f) == Some(ext))
    }
}

fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .map(|(_, ext)| ext)
}

/// One indicator of a project type.
#[derive(Debug, Clone, Copy)]
enum Indicator {
    /// A file at the project root.
    File(&'static str),
    /// Any root file with this extension (e.g. `.sln`).
    RootExtension(&'static str),
    /// A directory relative to the root.
    Dir(&'static str),
}

/// Rule set for one project type.
struct Rule {
    project_type: ProjectType,
    manifests: &'static [Indicator],
    secondary: &'static [Indicator],
    /// `(extension, minimum count)`; any satisfied threshold matches.
    extensions: &'static [(&'static str, usize)],
}

/// Rules in priority order. TypeScript precedes JavaScript because a
/// TypeScript project also carries `package.json`.
const RULES: &[Rule] = &[
    Rule {
        project_type: ProjectType::Typescript,
        manifests: &[Indicator::File("tsconfig.json")],
        secondary: &[],
        extensions: &[("ts", 3), ("tsx", 1)],
    },
    Rule {
        project_type: ProjectType::Javascript,
        manifests: &[Indicator::File("package.json")],
        secondary: &[
            Indicator::File("package-lock.json"),
            Indicator::File("yarn.lock"),
        ],
        extensions: &[("js", 3), ("jsx", 1)],
    },
    Rule {
        project_type: ProjectType::Python,
        manifests: &[
            Indicator::File("pyproject.toml"),
            Indicator::File("setup.py"),
            Indicator::File("setup.cfg"),
            Indicator::File("requirements.txt"),
        ],
        secondary: &[Indicator::File("Pipfile")],
        extensions: &[("py", 3)],
    },
    Rule {
        project_type: ProjectType::Rust,
        manifests: &[Indicator::File("Cargo.toml")],
        secondary: &[Indicator::File("Cargo.lock")],
        extensions: &[("rs", 3)],
    },
    Rule {
        project_type: ProjectType::Go,
        manifests: &[Indicator::File("go.mod")],
        secondary: &[Indicator::File("go.sum")],
        extensions: &[("go", 3)],
    },
    Rule {
        project_type: ProjectType::Java,
        manifests: &[
            Indicator::File("pom.xml"),
            Indicator::File("build.gradle"),
            Indicator::File("build.gradle.kts"),
        ],
        secondary: &[Indicator::Dir("src/main/java")],
        extensions: &[("java", 3)],
    },
    Rule {
        project_type: ProjectType::Csharp,
        manifests: &[
            Indicator::RootExtension("sln"),
            Indicator::RootExtension("csproj"),
        ],
        secondary: &[],
        extensions: &[("cs", 3)],
    },
];

fn matched_indicators(listing: &DirectoryListing, indicators: &[Indicator]) -> Vec<String> {
    indicators
        .iter()
        .filter_map(|indicator| match *indicator {
            Indicator::File(name) => listing.root_file(name).map(str::to_string),
            Indicator::RootExtension(ext) => {
                listing.root_file_with_extension(ext).map(str::to_string)
            }
            Indicator::Dir(path) => listing.has_dir(path).then(|| format!("{path}/")),
        })
        .collect()
}

fn matched_extensions(listing: &DirectoryListing, thresholds: &[(&str, usize)]) -> Vec<String> {
    for &(ext, minimum) in thresholds {
        let found: Vec<&str> = listing.files_with_extension(ext).collect();
        if found.len() >= minimum {
            return found
                .into_iter()
                .take(MAX_EVIDENCE)
                .map(str::to_string)
                .collect();
        }
    }
    Vec::new()
}

/// Infers the project type of a listing.
///
/// Manifest rules are tried for every type before any heuristic, so a
/// manifest always outranks a source file count.
pub fn detect(listing: &DirectoryListing) -> DetectionResult {
    let passes: [(Confidence, fn(&DirectoryListing, &Rule) -> Vec<String>); 3] = [
        (Confidence::High, |l, r| matched_indicators(l, r.manifests)),
        (Confidence::Medium, |l, r| matched_indicators(l, r.secondary)),
        (Confidence::Medium, |l, r| matched_extensions(l, r.extensions)),
    ];

    for (confidence, pass) in passes {
        for rule in RULES {
            let evidence = pass(listing, rule);
            if !evidence.is_empty() {
                debug!(project_type = %rule.project_type, %confidence, ?evidence, "Detected project type");
                return DetectionResult {
                    project_type: rule.project_type,
                    confidence,
                    evidence,
                };
            }
        }
    }

    debug!("No project type indicators found; using generic");
    DetectionResult {
        project_type: ProjectType::Generic,
        confidence: Confidence::Low,
        evidence: Vec::new(),
    }
}

/// Scans `root` and infers its project type.
pub fn detect_dir(root: &Path) -> io::Result<DetectionResult> {
    Ok(detect(&DirectoryListing::scan(root)?))
}
