//! # practices
//!
//! Layered workflow configuration for git projects: branch naming rules,
//! version files that must agree, and the strategy that ties them together.
//!
//! ## Quick Start
//!
//! ```no_run
//! use practices::config::ConfigLoader;
//! use practices::branch::validate_branch;
//!
//! # fn main() -> anyhow::Result<()> {
//! let resolved = ConfigLoader::from_env(".").resolve()?;
//! let result = validate_branch("feature/PMS-123-login", &resolved.document);
//! println!("valid: {}", result.valid);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod branch;
pub mod cli;
pub mod config;
pub mod data;
pub mod git;
pub mod pattern;
pub mod utils;
pub mod version;

pub use crate::cli::Cli;

/// The current version of practices.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
