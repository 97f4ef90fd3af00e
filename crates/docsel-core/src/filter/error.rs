//! Error type for filter parsing.

use thiserror::Error;

/// Raised while parsing a filter expression or any part of it.
///
/// Parsing fails eagerly: an expression either yields a complete
/// [`FilterSet`](super::FilterSet) or one of these errors, never a partial set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidFilterError {
    /// The name part carries no literal text (empty or only `*`).
    #[error("filter '{filter}' must specify at least some part of the test name")]
    EmptyName { filter: String },

    /// More than one `:` separator in a single filter.
    #[error("a filter has at most a name part and a ranges part, not {parts}: '{filter}'")]
    TooManyParts { filter: String, parts: usize },

    /// More than one `-` separator in a single range.
    #[error(
        "ranges must be a single number (eg '512'), a range without start (eg '-512'), \
         without end (eg '512-') or with start and end (eg '256-512'), not '{range}'"
    )]
    TooManyDashes { range: String },

    /// A number that is not a non-negative integer.
    #[error("example indexes must be non-negative integers, not '{text}'")]
    InvalidNumber { text: String },

    /// The name pattern could not be compiled.
    #[error("invalid name pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
