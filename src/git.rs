//! Read-only access to the project's git repository.

pub mod repository;

pub use repository::GitRepository;
