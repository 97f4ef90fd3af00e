//! Test discovery seam.
//!
//! Discovery itself happens elsewhere; this module defines the boundary the
//! engine relies on ([`TestFinder`]), an in-memory finder fed from a JSON
//! document ([`StaticFinder`]), and a finder that applies a filter expression
//! to whatever an inner finder discovers ([`FilteringFinder`]).
//!
//! ## Document Format
//!
//! ```json
//! {
//!   "modules": {
//!     "pkg.mod": [
//!       { "name": "pkg.mod.method", "examples": [{ "source": "f()", "want": "1\n" }] }
//!     ]
//!   }
//! }
//! ```
//!
//! A bare array of tests is also accepted and is registered under
//! [`DEFAULT_MODULE`]. Examples without an `index` get their position.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::filter::{FilterExpressionParser, FilterSet, InvalidFilterError};
use crate::select::select;
use crate::types::{Example, Test};

/// Module name used for documents that list tests without modules.
pub const DEFAULT_MODULE: &str = "__main__";

/// Error type for test discovery.
#[derive(Debug, Error)]
pub enum FindError {
    /// No tests are known for the requested module.
    #[error("module not found: {module}")]
    ModuleNotFound { module: String },

    /// The discovery document could not be read.
    #[error("invalid test document: {message}")]
    InvalidDocument { message: String },

    /// Discovery failed for another reason.
    #[error("discovery failed for '{module}': {message}")]
    Discovery { module: String, message: String },
}

/// Yields the tests of a module, with examples populated.
///
/// Implementations must give every example a stable 0-based `index` and every
/// test a fully-qualified dotted name.
pub trait TestFinder {
    /// Find the tests of `module`, in discovery order.
    fn find(&self, module: &str) -> Result<Vec<Arc<Test>>, FindError>;
}

impl<F: TestFinder + ?Sized> TestFinder for &F {
    fn find(&self, module: &str) -> Result<Vec<Arc<Test>>, FindError> {
        (**self).find(module)
    }
}

/// A finder over tests that were discovered ahead of time.
#[derive(Debug, Clone, Default)]
pub struct StaticFinder {
    modules: BTreeMap<String, Vec<Arc<Test>>>,
}

impl StaticFinder {
    /// Create an empty finder.
    pub fn new() -> Self {
        StaticFinder::default()
    }

    /// Register the tests of `module`, replacing any previous ones.
    pub fn insert(&mut self, module: impl Into<String>, tests: Vec<Arc<Test>>) {
        self.modules.insert(module.into(), tests);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_module(mut self, module: impl Into<String>, tests: Vec<Arc<Test>>) -> Self {
        self.insert(module, tests);
        self
    }

    /// Names of the registered modules, sorted.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Load a finder from a JSON discovery document.
    pub fn from_json(json: &str) -> Result<Self, FindError> {
        let document: TestDocument =
            serde_json::from_str(json).map_err(|e| FindError::InvalidDocument {
                message: e.to_string(),
            })?;

        let mut finder = StaticFinder::new();
        match document {
            TestDocument::Modules { modules } => {
                for (module, tests) in modules {
                    finder.insert(module, into_tests(tests));
                }
            }
            TestDocument::Tests(tests) => finder.insert(DEFAULT_MODULE, into_tests(tests)),
        }
        Ok(finder)
    }
}

impl TestFinder for StaticFinder {
    fn find(&self, module: &str) -> Result<Vec<Arc<Test>>, FindError> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| FindError::ModuleNotFound {
                module: module.to_string(),
            })
    }
}

/// A finder that filters what an inner finder discovers.
///
/// The expression is parsed when the finder is built, so an invalid
/// expression is reported before any test is looked at.
#[derive(Debug, Clone)]
pub struct FilteringFinder<F> {
    inner: F,
    filters: FilterSet,
}

impl<F: TestFinder> FilteringFinder<F> {
    /// Wrap `inner` with an already parsed filter set.
    pub fn new(inner: F, filters: FilterSet) -> Self {
        FilteringFinder { inner, filters }
    }

    /// Wrap `inner`, parsing `expression` with `parser`.
    pub fn from_expression<P: FilterExpressionParser + ?Sized>(
        inner: F,
        parser: &P,
        expression: &str,
    ) -> Result<Self, InvalidFilterError> {
        let filters = parser.parse_filters(expression)?;
        Ok(FilteringFinder::new(inner, filters))
    }

    /// The filters applied to discovered tests.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// The wrapped finder.
    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: TestFinder> TestFinder for FilteringFinder<F> {
    fn find(&self, module: &str) -> Result<Vec<Arc<Test>>, FindError> {
        let tests = self.inner.find(module)?;
        if self.filters.is_empty() {
            return Ok(tests);
        }

        let selected = select(&tests, &self.filters);
        debug!(
            module,
            discovered = tests.len(),
            selected = selected.len(),
            "filtered discovered tests"
        );
        Ok(selected)
    }
}

// ============================================================================
// Document Format
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TestDocument {
    Modules {
        modules: BTreeMap<String, Vec<TestEntry>>,
    },
    Tests(Vec<TestEntry>),
}

#[derive(Debug, Deserialize)]
struct TestEntry {
    name: String,
    #[serde(default)]
    filename: Option<PathBuf>,
    #[serde(default)]
    lineno: Option<usize>,
    #[serde(default)]
    examples: Vec<ExampleEntry>,
}

#[derive(Debug, Deserialize)]
struct ExampleEntry {
    #[serde(default)]
    index: Option<usize>,
    #[serde(default)]
    source: String,
    #[serde(default)]
    want: String,
    #[serde(default)]
    lineno: Option<usize>,
}

fn into_tests(entries: Vec<TestEntry>) -> Vec<Arc<Test>> {
    entries
        .into_iter()
        .map(|entry| {
            let examples = entry
                .examples
                .into_iter()
                .enumerate()
                .map(|(position, example)| {
                    Arc::new(Example {
                        index: example.index.unwrap_or(position),
                        source: example.source,
                        want: example.want,
                        lineno: example.lineno,
                    })
                })
                .collect();
            Arc::new(Test {
                name: entry.name,
                filename: entry.filename,
                lineno: entry.lineno,
                examples,
            })
        })
        .collect()
}
