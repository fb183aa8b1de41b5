//! Text, JSON and YAML rendering of command results.

use std::fmt::{self, Write as _};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::branch::{BranchPlan, BranchValidation};
use crate::config::{DetectionResult, InitOutcome, ResolvedConfig, ValidationReport};
use crate::version::{BumpOutcome, VersionReport};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// A result that has a human-readable rendering.
pub trait TextReport {
    /// Renders the result for a terminal.
    fn to_text(&self) -> Result<String>;

    /// Whether the command should exit successfully.
    fn is_success(&self) -> bool {
        true
    }
}

/// Renders `value` in the requested format.
pub fn render<T: Serialize + TextReport>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => value.to_text(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize report to JSON")
        }
        OutputFormat::Yaml => super::to_yaml(value).context("Failed to serialize report to YAML"),
    }
}

fn status_icon(ok: bool) -> &'static str {
    if ok {
        "✅"
    } else {
        "❌"
    }
}

impl TextReport for ValidationReport {
    fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        let verdict = if self.valid {
            "Configuration is valid"
        } else {
            "Configuration is invalid"
        };
        writeln!(out, "{} {verdict}", status_icon(self.valid))?;
        for error in &self.errors {
            writeln!(out, "   error: {error}")?;
        }
        for path in &self.missing_files {
            writeln!(out, "   missing file: {path}")?;
        }
        for warning in &self.warnings {
            writeln!(out, "   warning: {warning}")?;
        }
        Ok(out)
    }

    fn is_success(&self) -> bool {
        self.valid
    }
}

impl TextReport for BranchValidation {
    fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        match &self.branch_type {
            Some(branch_type) if self.valid => {
                writeln!(out, "{} Valid {branch_type} branch", status_icon(true))?;
                if let Some(identifier) = &self.identifier {
                    writeln!(out, "   identifier: {identifier}")?;
                }
                if let Some(description) = &self.description {
                    writeln!(out, "   description: {description}")?;
                }
                if let Some(base) = &self.base {
                    writeln!(out, "   base: {base}")?;
                }
                if !self.targets.is_empty() {
                    writeln!(out, "   targets: {}", self.targets.join(", "))?;
                }
            }
            _ => {
                writeln!(out, "{} Invalid branch name", status_icon(false))?;
                for error in &self.errors {
                    writeln!(out, "   {error}")?;
                }
            }
        }
        Ok(out)
    }

    fn is_success(&self) -> bool {
        self.valid
    }
}

impl TextReport for BranchPlan {
    fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "{}", self.name)?;
        writeln!(out, "   base: {}", self.base)?;
        if !self.targets.is_empty() {
            writeln!(out, "   targets: {}", self.targets.join(", "))?;
        }
        Ok(out)
    }
}

impl TextReport for VersionReport {
    fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        match (&self.version, self.consistent) {
            (Some(version), true) => {
                writeln!(out, "{} Version {version} is consistent", status_icon(true))?;
            }
            _ => writeln!(out, "{} Versions are inconsistent", status_icon(false))?,
        }
        for file in &self.files {
            let version = file.version.as_deref().unwrap_or("-");
            let marker = if file.consistent { " " } else { "!" };
            writeln!(out, " {marker} {}: {version}", file.path)?;
        }
        for error in &self.errors {
            writeln!(out, "   error: {error}")?;
        }
        Ok(out)
    }

    fn is_success(&self) -> bool {
        self.consistent
    }
}

impl TextReport for BumpOutcome {
    fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        let action = if self.dry_run { "Would bump" } else { "Bumped" };
        writeln!(
            out,
            "{action} {} version: {} -> {}",
            self.part, self.previous_version, self.new_version
        )?;
        for change in &self.changes {
            writeln!(out, "   {}: {} -> {}", change.path, change.previous, change.new)?;
        }
        Ok(out)
    }
}

impl TextReport for DetectionResult {
    fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        writeln!(
            out,
            "{} ({} confidence)",
            self.project_type, self.confidence
        )?;
        for evidence in &self.evidence {
            writeln!(out, "   {evidence}")?;
        }
        Ok(out)
    }
}

impl TextReport for ResolvedConfig {
    fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "# root: {}", self.root.display())?;
        for source in &self.provenance.layers {
            for path in &source.paths {
                writeln!(out, "# {} layer: {}", source.layer, path.display())?;
            }
        }
        if let Some(detection) = &self.provenance.synthesized {
            writeln!(
                out,
                "# no configuration found; defaults for detected {} project ({} confidence)",
                detection.project_type, detection.confidence
            )?;
        }
        let yaml =
            serde_yaml::to_string(&self.document).context("Failed to serialize configuration")?;
        out.push_str(&yaml);
        Ok(out)
    }
}

impl TextReport for InitOutcome {
    fn to_text(&self) -> Result<String> {
        let mut out = String::new();
        writeln!(
            out,
            "{} Wrote {} ({} project, {} strategy)",
            status_icon(true),
            self.path.display(),
            self.project_type,
            self.branching_strategy
        )?;
        Ok(out)
    }
}
