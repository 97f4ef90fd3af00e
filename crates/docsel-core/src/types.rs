//! Tests and examples as produced by test discovery.
//!
//! A [`Test`] is a named, ordered collection of [`Example`]s. Tests are shared
//! as `Arc<Test>` so that selection can hand back the very same value when
//! nothing was trimmed, and trimmed copies share the `Arc<Example>` payloads of
//! the original.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One example inside a test.
///
/// `index` is the 0-based position the example had when the test was
/// discovered. It stays the same when the example ends up in a trimmed copy
/// of the test, so filtering an already filtered test is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Position within the discovered test.
    pub index: usize,
    /// Source code of the example.
    pub source: String,
    /// Expected output.
    #[serde(default)]
    pub want: String,
    /// Line number of the example relative to its docstring, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<usize>,
}

impl Example {
    /// Create an example at `index` with no expected output.
    pub fn new(index: usize, source: impl Into<String>) -> Self {
        Example {
            index,
            source: source.into(),
            want: String::new(),
            lineno: None,
        }
    }

    /// Set the expected output.
    pub fn with_want(mut self, want: impl Into<String>) -> Self {
        self.want = want.into();
        self
    }
}

/// A discovered test: a fully-qualified dotted name and its examples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    /// Fully-qualified dotted name, e.g. `pkg.module.Class.method`.
    pub name: String,
    /// File the test was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<PathBuf>,
    /// Line number of the docstring within `filename`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<usize>,
    /// Examples in discovery order.
    pub examples: Vec<Arc<Example>>,
}

impl Test {
    /// Create a test from its name and examples.
    pub fn new(name: impl Into<String>, examples: Vec<Arc<Example>>) -> Self {
        Test {
            name: name.into(),
            filename: None,
            lineno: None,
            examples,
        }
    }

    /// Create a test with `count` placeholder examples, indexed `0..count`.
    pub fn with_example_count(name: impl Into<String>, count: usize) -> Self {
        let examples = (0..count)
            .map(|index| Arc::new(Example::new(index, format!("example_{index}"))))
            .collect();
        Test::new(name, examples)
    }

    /// Set the file location.
    pub fn with_location(mut self, filename: impl Into<PathBuf>, lineno: usize) -> Self {
        self.filename = Some(filename.into());
        self.lineno = Some(lineno);
        self
    }

    /// Build a copy of this test holding only `examples`.
    ///
    /// Name and location are kept. The example payloads are shared, not cloned.
    pub fn partial_of(&self, examples: Vec<Arc<Example>>) -> Test {
        Test {
            name: self.name.clone(),
            filename: self.filename.clone(),
            lineno: self.lineno,
            examples,
        }
    }

    /// Indices of the examples held by this test, in order.
    pub fn example_indices(&self) -> Vec<usize> {
        self.examples.iter().map(|example| example.index).collect()
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Returns true if the test has no examples.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
