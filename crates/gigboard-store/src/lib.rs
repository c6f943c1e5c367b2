//! # gigboard-store
//!
//! Durable persistence for project records, backed by one flat JSON file.
//!
//! The store owns the file: every mutation is a full read-modify-write
//! cycle ending in an atomic temp-write-plus-rename, so a reader never
//! observes a half-written file and a crash mid-write leaves the previous
//! version intact.

pub mod store;

pub use store::{JsonFileStore, ProjectStore};
