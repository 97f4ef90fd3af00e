//! Core engine for docsel.
//!
//! This crate turns a filter expression into matchable predicates and applies
//! them to a tree of discovered documentation tests:
//! - Data model for tests and their examples
//! - Filter expression grammar (name patterns and index ranges)
//! - Selection of tests and examples by a parsed filter set
//! - Seams for pluggable test discovery and test runners
//! - Error types and error codes
//! - JSON output types for CLI responses
//! - Layered configuration

pub mod config;
pub mod error;
pub mod filter;
pub mod finder;
pub mod output;
pub mod runner;
pub mod select;
pub mod types;

pub use filter::{
    parse_expression, Filter, FilterExpressionParser, FilterSet, IndexRange, IndexedFilterParser,
    InvalidFilterError, NamePattern, RangeSet,
};
pub use select::{select, select_test};
pub use types::{Example, Test};
