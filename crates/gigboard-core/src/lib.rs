//! # gigboard-core
//!
//! Core types shared by the gigboard crates: the `Project` record, the
//! untrusted create-request shape, id generation, the sample dataset, and
//! the common error type.

pub mod error;
pub mod models;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{new_project_id, sample_projects, NewProject, Project};
