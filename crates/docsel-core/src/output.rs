//! JSON output types for CLI responses.
//!
//! Every response carries a `status` and the `schema_version` so consumers
//! can detect incompatible changes.

use std::io::{self, Write};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{DocselError, OutputErrorCode};
use crate::filter::{Filter, FilterSet};
use crate::runner::TestResults;
use crate::select::SelectionSummary;
use crate::types::Test;

/// Current schema version of the JSON responses.
pub const SCHEMA_VERSION: &str = "1";

/// One parsed filter, rendered back as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterInfo {
    /// Name specifier.
    pub name: String,
    /// Range specifier, absent when every example is selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranges: Option<String>,
}

impl From<&Filter> for FilterInfo {
    fn from(filter: &Filter) -> Self {
        FilterInfo {
            name: filter.name().to_string(),
            ranges: filter.ranges().map(ToString::to_string),
        }
    }
}

/// Response for `docsel parse`.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// The expression as given.
    pub expression: String,
    /// True when the expression selects everything.
    pub select_all: bool,
    /// Parsed filters, in expression order.
    pub filters: Vec<FilterInfo>,
}

impl ParseResponse {
    /// Build from an expression and its parsed filters.
    pub fn new(expression: impl Into<String>, filters: &FilterSet) -> Self {
        ParseResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            expression: expression.into(),
            select_all: filters.is_empty(),
            filters: filters.iter().map(FilterInfo::from).collect(),
        }
    }
}

/// Response for `docsel select`.
#[derive(Debug, Clone, Serialize)]
pub struct SelectResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Module the tests were discovered in.
    pub module: String,
    /// The expression as given.
    pub expression: String,
    /// Counts for the selection.
    pub summary: SelectionSummary,
    /// Selected tests with their kept examples.
    pub tests: Vec<Arc<Test>>,
}

impl SelectResponse {
    /// Build from a finished selection.
    pub fn new(
        module: impl Into<String>,
        expression: impl Into<String>,
        summary: SelectionSummary,
        tests: Vec<Arc<Test>>,
    ) -> Self {
        SelectResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            module: module.into(),
            expression: expression.into(),
            summary,
            tests,
        }
    }
}

/// Response for `docsel run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    /// Status: "ok" if no example failed, "failed" otherwise.
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Module the tests were discovered in.
    pub module: String,
    /// The expression as given.
    pub expression: String,
    /// Aggregated results.
    pub results: TestResults,
}

impl RunResponse {
    /// Build from run results.
    pub fn new(
        module: impl Into<String>,
        expression: impl Into<String>,
        results: TestResults,
    ) -> Self {
        RunResponse {
            status: if results.passed() { "ok" } else { "failed" }.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            module: module.into(),
            expression: expression.into(),
            results,
        }
    }
}

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
}

impl ErrorInfo {
    /// Create from a DocselError.
    pub fn from_error(err: &DocselError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a DocselError.
    pub fn from_error(err: &DocselError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Render example indices compactly, collapsing consecutive runs.
///
/// `[0, 1, 2, 5, 7, 8]` becomes `"0-2,5,7-8"`.
pub fn format_indices(indices: &[usize]) -> String {
    let mut parts = Vec::new();
    let mut iter = indices.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while let Some(next) = iter.next_if(|&next| end.checked_add(1) == Some(next)) {
            end = next;
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{start}-{end}"));
        }
    }

    parts.join(",")
}
