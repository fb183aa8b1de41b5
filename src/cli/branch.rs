//! Branch-related CLI commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::GlobalOptions;
use crate::branch::{construct_branch, validate_branch};
use crate::git::GitRepository;

/// Branch operations.
#[derive(Parser)]
pub struct BranchCommand {
    /// Branch subcommand to execute.
    #[command(subcommand)]
    pub command: BranchSubcommands,
}

/// Branch subcommands.
#[derive(Subcommand)]
pub enum BranchSubcommands {
    /// Checks a branch name against the configured branch types.
    Check(CheckCommand),
    /// Builds a branch name for a branch type.
    Name(NameCommand),
}

/// Check command options.
#[derive(Parser)]
pub struct CheckCommand {
    /// Branch name; defaults to the currently checked-out branch.
    pub name: Option<String>,
}

/// Name command options.
#[derive(Parser)]
pub struct NameCommand {
    /// Branch type, e.g. feature or release.
    pub branch_type: String,

    /// Ticket key or version, e.g. PMS-123 or 1.4.0.
    pub identifier: Option<String>,

    /// Short description; words are joined and slugified.
    pub description: Vec<String>,
}

impl BranchCommand {
    /// Executes the branch command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        match self.command {
            BranchSubcommands::Check(check_cmd) => check_cmd.execute(global),
            BranchSubcommands::Name(name_cmd) => name_cmd.execute(global),
        }
    }
}

impl CheckCommand {
    /// Executes the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        let resolved = global.resolve()?;
        let name = match self.name {
            Some(name) => name,
            None => GitRepository::discover(&resolved.root)?
                .current_branch()
                .context("Failed to determine the current branch")?,
        };
        global.emit(&validate_branch(&name, &resolved.document))
    }
}

impl NameCommand {
    /// Executes the name command.
    pub fn execute(self, global: &GlobalOptions) -> Result<bool> {
        let resolved = global.resolve()?;
        let description = self.description.join(" ");
        let plan = construct_branch(
            &resolved.document,
            &self.branch_type,
            self.identifier.as_deref(),
            Some(description.as_str()).filter(|d| !d.is_empty()),
        )?;
        global.emit(&plan)
    }
}
