//! Applying a filter set to discovered tests.
//!
//! For each test, the filters whose name pattern matches decide which examples
//! are kept (union of their ranges). A test is then:
//! - dropped, if no filter matches or no example is kept
//! - returned as the same `Arc`, if every example is kept
//! - replaced by a trimmed copy sharing the kept example payloads otherwise
//!
//! Output order always equals input order.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::filter::FilterSet;
use crate::types::{Example, Test};

/// Filter `tests` according to `filters`.
///
/// An empty filter set selects every test unchanged.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use docsel_core::{parse_expression, select, Test};
///
/// let tests = vec![
///     Arc::new(Test::with_example_count("pkg.mod.method", 25)),
///     Arc::new(Test::with_example_count("pkg.mod.other", 3)),
/// ];
/// let filters = parse_expression("method:10-20,7").unwrap();
///
/// let selected = select(&tests, &filters);
/// assert_eq!(selected.len(), 1);
/// assert_eq!(selected[0].len(), 12);
/// ```
pub fn select(tests: &[Arc<Test>], filters: &FilterSet) -> Vec<Arc<Test>> {
    select_with_summary(tests, filters).0
}

/// Filter `tests` and report what was kept.
pub fn select_with_summary(
    tests: &[Arc<Test>],
    filters: &FilterSet,
) -> (Vec<Arc<Test>>, SelectionSummary) {
    let mut summary = SelectionSummary {
        tests_discovered: tests.len(),
        ..SelectionSummary::default()
    };
    let mut selected = Vec::with_capacity(tests.len());

    for test in tests {
        summary.examples_discovered += test.len();
        let Some(kept) = select_test(test, filters) else {
            continue;
        };
        if !Arc::ptr_eq(&kept, test) {
            summary.tests_partial += 1;
        }
        summary.tests_selected += 1;
        summary.examples_selected += kept.len();
        selected.push(kept);
    }

    debug!(
        filters = filters.len(),
        tests_discovered = summary.tests_discovered,
        tests_selected = summary.tests_selected,
        tests_partial = summary.tests_partial,
        "selected tests"
    );

    (selected, summary)
}

/// Filter a single test.
///
/// Returns `None` to drop the test, the same `Arc` if all of its examples are
/// kept, or a new test holding only the kept examples.
pub fn select_test(test: &Arc<Test>, filters: &FilterSet) -> Option<Arc<Test>> {
    if filters.is_empty() {
        return Some(Arc::clone(test));
    }

    let matching = filters.matching(test);
    if matching.is_empty() {
        trace!(test = %test.name, "no filter matches, dropping");
        return None;
    }

    let kept: Vec<Arc<Example>> = test
        .examples
        .iter()
        .filter(|example| matching.iter().any(|filter| filter.matches_example(example)))
        .cloned()
        .collect();

    if kept.is_empty() {
        trace!(test = %test.name, "no example selected, dropping");
        None
    } else if kept.len() == test.examples.len() {
        Some(Arc::clone(test))
    } else {
        trace!(
            test = %test.name,
            kept = kept.len(),
            discovered = test.examples.len(),
            "trimmed examples"
        );
        Some(Arc::new(test.partial_of(kept)))
    }
}

/// Counts describing one selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    /// Tests passed in.
    pub tests_discovered: usize,
    /// Tests kept (fully or partially).
    pub tests_selected: usize,
    /// Kept tests with fewer examples than discovered.
    pub tests_partial: usize,
    /// Examples across all tests passed in.
    pub examples_discovered: usize,
    /// Examples across all kept tests.
    pub examples_selected: usize,
}

impl SelectionSummary {
    /// Compare a selection with the tests it was made from.
    ///
    /// A selected test counts as partial when it is not one of `discovered`.
    pub fn summarize(discovered: &[Arc<Test>], selected: &[Arc<Test>]) -> Self {
        let known: HashSet<*const Test> = discovered.iter().map(Arc::as_ptr).collect();
        let tests_partial = selected
            .iter()
            .filter(|kept| !known.contains(&Arc::as_ptr(kept)))
            .count();

        SelectionSummary {
            tests_discovered: discovered.len(),
            tests_selected: selected.len(),
            tests_partial,
            examples_discovered: discovered.iter().map(|test| test.len()).sum(),
            examples_selected: selected.iter().map(|test| test.len()).sum(),
        }
    }
}
