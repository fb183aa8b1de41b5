//! CLI interface for practices.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{ConfigLoader, ResolvedConfig};
use crate::data::{render, OutputFormat, TextReport};

pub mod branch;
pub mod config;
pub mod version;

/// practices: branch naming and version conventions for a project.
#[derive(Parser)]
#[command(name = "practices")]
#[command(about = "Enforces branch naming and version conventions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Options shared by every command.
    #[command(flatten)]
    pub global: GlobalOptions,

    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Project root directory.
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl GlobalOptions {
    /// Absolute project root.
    pub fn root(&self) -> Result<PathBuf> {
        fs::canonicalize(&self.dir)
            .with_context(|| format!("Project directory not found: {}", self.dir.display()))
    }

    /// Resolves the project's configuration from disk.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let root = self.root()?;
        ConfigLoader::from_env(&root)
            .resolve()
            .with_context(|| format!("Failed to resolve configuration for {}", root.display()))
    }

    /// Prints `value` in the selected format and reports whether it succeeded.
    pub fn emit<T: Serialize + TextReport>(&self, value: &T) -> Result<bool> {
        let output = render(value, self.format)?;
        println!("{}", output.trim_end());
        Ok(value.is_success())
    }
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Configuration resolution, validation and defaults.
    Config(config::ConfigCommand),
    /// Branch name validation and construction.
    Branch(branch::BranchCommand),
    /// Version consistency and bumps.
    Version(version::VersionCommand),
}

impl Cli {
    /// Executes the CLI command; `Ok(false)` means the result was a failure.
    pub fn execute(self) -> Result<bool> {
        match self.command {
            Commands::Config(config_cmd) => config_cmd.execute(&self.global),
            Commands::Branch(branch_cmd) => branch_cmd.execute(&self.global),
            Commands::Version(version_cmd) => version_cmd.execute(&self.global),
        }
    }
}
