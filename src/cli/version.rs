//! Version-related CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::GlobalOptions;
use crate::version::{bump_version, check_versions, BumpOptions, VersionPart};

/// Version operations.
#[derive(Parser)]
pub struct VersionCommand {
    /// Version subcommand to execute.
    #[command(subcommand)]
    pub command: VersionSubcommands,
}

/// Version subcommands.
#[derive(Subcommand)]
pub enum VersionSubcommands {
    /// Checks that every configured file carries the same version.
    Check(CheckCommand),
    /// Increments the version in every configured file.
    Bump(BumpCommand),
}

/// Check command options.
#[derive(Parser)]
pub struct CheckCommand {}

/// Bump command options.
#[derive(Parser)]
pub struct BumpCommand {
    /// Component to increment.
    #[arg(value_enum)]
    pub part: VersionPart,

    /// Shows the changes without writing any file.
    #[arg(long)]
    pub dry_run: bool,
}

impl VersionCommand {
    /// Executes the version command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        match self.command {
            VersionSubcommands::Check(check_cmd) => check_cmd.execute(global),
            VersionSubcommands::Bump(bump_cmd) => bump_cmd.execute(global),
        }
    }
}

impl CheckCommand {
    /// Executes the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        let resolved = global.resolve()?;
        global.emit(&check_versions(&resolved.document, &resolved.root))
    }
}

impl BumpCommand {
    /// Executes the bump command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        let resolved = global.resolve()?;
        let options = BumpOptions {
            part: self.part,
            dry_run: self.dry_run,
        };
        let outcome = bump_version(&resolved.document, &resolved.root, options)?;
        global.emit(&outcome)
    }
}
