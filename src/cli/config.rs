//! Configuration-related CLI commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::GlobalOptions;
use crate::config::{self, detector, validator, BranchingStrategy, InitOptions, ProjectType};

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Shows the resolved configuration and where each layer came from.
    Show(ShowCommand),
    /// Checks the resolved configuration against the project directory.
    Validate(ValidateCommand),
    /// Detects the project type from the files in the project directory.
    Detect(DetectCommand),
    /// Writes a default configuration document to the project root.
    Init(InitCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {}

/// Validate command options.
#[derive(Parser)]
pub struct ValidateCommand {}

/// Detect command options.
#[derive(Parser)]
pub struct DetectCommand {}

/// Init command options.
#[derive(Parser)]
pub struct InitCommand {
    /// Project type; detected when omitted.
    #[arg(long, value_parser = parse_project_type)]
    pub project_type: Option<ProjectType>,

    /// Branching strategy (gitflow, github-flow, trunk).
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<BranchingStrategy>,

    /// Overwrite an existing configuration document.
    #[arg(long)]
    pub force: bool,
}

fn parse_project_type(value: &str) -> Result<ProjectType, String> {
    value.parse()
}

fn parse_strategy(value: &str) -> Result<BranchingStrategy, String> {
    value.parse()
}

impl ConfigCommand {
    /// Executes the config command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute(global),
            ConfigSubcommands::Validate(validate_cmd) => validate_cmd.execute(global),
            ConfigSubcommands::Detect(detect_cmd) => detect_cmd.execute(global),
            ConfigSubcommands::Init(init_cmd) => init_cmd.execute(global),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        global.emit(&global.resolve()?)
    }
}

impl ValidateCommand {
    /// Executes the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        let resolved = global.resolve()?;
        let report = validator::validate(&resolved.document, &resolved.root);
        global.emit(&report)
    }
}

impl DetectCommand {
    /// Executes the detect command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        let root = global.root()?;
        let detection = detector::detect_dir(&root)
            .with_context(|| format!("Failed to scan {}", root.display()))?;
        global.emit(&detection)
    }
}

impl InitCommand {
    /// Executes the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        let root = global.root()?;
        let options = InitOptions {
            project_type: self.project_type,
            strategy: self.strategy,
            force: self.force,
        };
        let outcome = config::init_document(&root, &options)?;
        global.emit(&outcome)
    }
}
