//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::Repository;

/// Prefix of local branch references.
const LOCAL_BRANCH_PREFIX: &str = "refs/heads/";

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Opens the repository containing `path`, searching parent directories.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .with_context(|| format!("Not in a git repository: {}", path.display()))?;

        Ok(Self { repo })
    }

    /// Name of the checked-out branch.
    ///
    /// Works on a freshly initialised repository whose branch has no commits yet.
    pub fn current_branch(&self) -> Result<String> {
        let head = self
            .repo
            .find_reference("HEAD")
            .context("Failed to get HEAD reference")?;

        if let Some(target) = head.symbolic_target() {
            if let Some(name) = target.strip_prefix(LOCAL_BRANCH_PREFIX) {
                return Ok(name.to_string());
            }
        }

        anyhow::bail!("Repository is in detached HEAD state")
    }
}
