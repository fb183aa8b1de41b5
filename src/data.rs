//! Report rendering and serialization.

pub mod report;
pub mod yaml;

pub use report::{render, OutputFormat, TextReport};
pub use yaml::to_yaml;
