//! Test runner seam and filtered runs.
//!
//! [`run_with_filter`] ties the pieces together: parse an expression, find the
//! tests of a module, select, and hand every selected test to a
//! [`TestRunner`]; [`run_selected`] does the same for a filter set parsed
//! up front. A test that lost some of its examples to the filter is
//! reported as partially selected; that is never a failure.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::DocselError;
use crate::filter::{FilterExpressionParser, FilterSet};
use crate::finder::TestFinder;
use crate::select::select_test;
use crate::types::Test;

/// Outcome of running one test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    /// Examples that failed.
    pub failed: usize,
    /// Examples that were run.
    pub attempted: usize,
}

/// Executes the examples of a test.
pub trait TestRunner {
    /// Run every example of `test` and report the counts.
    fn run(&mut self, test: &Test) -> TestOutcome;
}

impl<R: TestRunner + ?Sized> TestRunner for &mut R {
    fn run(&mut self, test: &Test) -> TestOutcome {
        (**self).run(test)
    }
}

/// A runner that attempts every example and fails none.
///
/// Useful to see what a filter would run without executing anything.
#[derive(Debug, Clone, Default)]
pub struct DryRunRunner {
    seen: Vec<String>,
}

impl DryRunRunner {
    /// Create a dry-run runner.
    pub fn new() -> Self {
        DryRunRunner::default()
    }

    /// Names of the tests handed to this runner, in order.
    pub fn seen(&self) -> &[String] {
        &self.seen
    }
}

impl TestRunner for DryRunRunner {
    fn run(&mut self, test: &Test) -> TestOutcome {
        self.seen.push(test.name.clone());
        TestOutcome {
            failed: 0,
            attempted: test.len(),
        }
    }
}

/// Aggregated results of a filtered run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestResults {
    /// Examples that failed.
    pub failed: usize,
    /// Examples that were run.
    pub attempted: usize,
    /// Tests handed to the runner.
    pub tests_run: usize,
    /// Tests run with fewer examples than discovered.
    pub partially_selected: usize,
}

impl TestResults {
    /// Fold one test outcome into the totals.
    pub fn record(&mut self, outcome: TestOutcome, partial: bool) {
        self.failed += outcome.failed;
        self.attempted += outcome.attempted;
        self.tests_run += 1;
        if partial {
            self.partially_selected += 1;
        }
    }

    /// Returns true if no example failed.
    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

/// Find the tests of `module`, keep those selected by `expression`, and run
/// them in discovery order.
///
/// The expression is parsed before discovery, so an invalid expression never
/// leads to a partial run.
///
/// # Errors
///
/// - `InvalidFilter` if the expression does not parse
/// - `Discovery` if `finder` fails
pub fn run_with_filter<F, R, P>(
    finder: &F,
    runner: &mut R,
    parser: &P,
    module: &str,
    expression: &str,
) -> Result<TestResults, DocselError>
where
    F: TestFinder + ?Sized,
    R: TestRunner + ?Sized,
    P: FilterExpressionParser + ?Sized,
{
    let filters = parser.parse_filters(expression)?;
    run_selected(finder, runner, module, &filters)
}

/// Find the tests of `module`, keep those selected by an already parsed
/// filter set, and run them in discovery order.
///
/// # Errors
///
/// - `Discovery` if `finder` fails
pub fn run_selected<F, R>(
    finder: &F,
    runner: &mut R,
    module: &str,
    filters: &FilterSet,
) -> Result<TestResults, DocselError>
where
    F: TestFinder + ?Sized,
    R: TestRunner + ?Sized,
{
    let tests = finder.find(module)?;
    debug!(module, discovered = tests.len(), "running filtered tests");

    let mut results = TestResults::default();
    for test in &tests {
        let Some(selected) = select_test(test, filters) else {
            continue;
        };
        let partial = !Arc::ptr_eq(&selected, test);
        let outcome = runner.run(&selected);
        results.record(outcome, partial);
    }

    info!(
        module,
        tests_run = results.tests_run,
        attempted = results.attempted,
        failed = results.failed,
        partially_selected = results.partially_selected,
        "run finished"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::filter::{parse_expression, IndexedFilterParser};
    use crate::finder::{FindError, StaticFinder};

    fn finder() -> StaticFinder {
        StaticFinder::new().with_module(
            "pkg.mod",
            vec![
                Arc::new(Test::with_example_count("pkg.mod.method", 25)),
                Arc::new(Test::with_example_count("pkg.mod.other", 3)),
                Arc::new(Test::with_example_count("pkg.mod.method_plus", 2)),
            ],
        )
    }

    /// Fails every example with an odd index.
    struct OddFails {
        indices: Vec<Vec<usize>>,
    }

    impl TestRunner for OddFails {
        fn run(&mut self, test: &Test) -> TestOutcome {
            self.indices.push(test.example_indices());
            TestOutcome {
                failed: test.examples.iter().filter(|e| e.index % 2 == 1).count(),
                attempted: test.len(),
            }
        }
    }

    #[test]
    fn runs_only_selected_examples() {
        let mut runner = OddFails { indices: vec![] };
        let results = run_with_filter(
            &finder(),
            &mut runner,
            &IndexedFilterParser,
            "pkg.mod",
            "method:10-20,7",
        )
        .unwrap();

        let mut expected = vec![7];
        expected.extend(10..=20);
        assert_eq!(runner.indices, vec![expected]);
        assert_eq!(
            results,
            TestResults {
                failed: 6,
                attempted: 12,
                tests_run: 1,
                partially_selected: 1,
            }
        );
        assert!(!results.passed());
    }

    #[test]
    fn empty_expression_runs_everything() {
        let mut runner = DryRunRunner::new();
        let results =
            run_with_filter(&finder(), &mut runner, &IndexedFilterParser, "pkg.mod", "").unwrap();

        assert_eq!(
            runner.seen(),
            &["pkg.mod.method", "pkg.mod.other", "pkg.mod.method_plus"]
        );
        assert_eq!(results.attempted, 30);
        assert_eq!(results.partially_selected, 0);
        assert!(results.passed());
    }

    #[test]
    fn invalid_expression_runs_nothing() {
        let mut runner = DryRunRunner::new();
        let result = run_with_filter(
            &finder(),
            &mut runner,
            &IndexedFilterParser,
            "pkg.mod",
            "method:5-abc",
        );

        assert!(matches!(result, Err(DocselError::InvalidFilter(_))));
        assert!(runner.seen().is_empty());
    }

    struct BrokenFinder;

    impl TestFinder for BrokenFinder {
        fn find(&self, module: &str) -> Result<Vec<Arc<Test>>, FindError> {
            Err(FindError::Discovery {
                module: module.to_string(),
                message: "import failed".to_string(),
            })
        }
    }

    #[test]
    fn discovery_errors_are_reported() {
        let mut runner = DryRunRunner::new();
        let result =
            run_with_filter(&BrokenFinder, &mut runner, &IndexedFilterParser, "pkg", "x");
        match result {
            Err(DocselError::Discovery(FindError::Discovery { module, .. })) => {
                assert_eq!(module, "pkg");
            }
            other => panic!("Expected Discovery, got {other:?}"),
        }
    }

    #[test]
    fn no_matching_tests_is_not_an_error() {
        let mut runner = DryRunRunner::new();
        let results = run_with_filter(
            &finder(),
            &mut runner,
            &IndexedFilterParser,
            "pkg.mod",
            "nothing_here",
        )
        .unwrap();
        assert_eq!(results, TestResults::default());
        assert!(results.passed());
    }

    #[test]
    fn run_selected_matches_run_with_filter() {
        let filters = parse_expression("method:2- other:0").unwrap();

        let mut direct = OddFails { indices: vec![] };
        let from_set = run_selected(&finder(), &mut direct, "pkg.mod", &filters).unwrap();

        let mut parsed = OddFails { indices: vec![] };
        let from_text = run_with_filter(
            &finder(),
            &mut parsed,
            &IndexedFilterParser,
            "pkg.mod",
            "method:2- other:0",
        )
        .unwrap();

        assert_eq!(from_set, from_text);
        assert_eq!(direct.indices, parsed.indices);
        assert_eq!(from_set.tests_run, 2);
        assert_eq!(from_set.partially_selected, 2);
    }
}
