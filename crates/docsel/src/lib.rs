//! docsel - select individual documentation tests and examples.
//!
//! This crate provides the CLI binary for docsel.
//!
//! ## Modules
//!
//! - `cli` - CLI command implementations

pub mod cli;

// Re-export core types for convenience
pub use docsel_core::config::{CliOverrides, LogLevel, OutputFormat, ResolvedConfig};
pub use docsel_core::error::{DocselError, OutputErrorCode};
pub use docsel_core::output::{ErrorResponse, SCHEMA_VERSION};
