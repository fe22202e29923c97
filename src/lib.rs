//! railyard - scaffold new projects, with a train for company.
//!
//! This library provides the core functionality for the railyard CLI:
//! project name handling, the template catalog, template actions (repository
//! snapshots and generator commands), git setup, and the scrolling ASCII
//! train animation shown while long-running steps execute.

#![deny(missing_docs)]

/// Version string from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod actions;
pub mod cli;
pub mod config;
pub mod feedback;
pub mod git;
pub mod logger;
pub mod project;
pub mod prompt;
pub mod templates;

// Re-export key types for convenience
pub use feedback::{Phase, TrainAnimation};
pub use templates::{Template, TemplateSource};
