//! Command implementations for the railyard CLI.
//!
//! This module contains the actual implementations of CLI commands,
//! separated from the argument parsing definitions in cli/mod.rs.

pub mod completions;
pub mod init;
pub mod new;
pub mod templates;
