//! Filter expression parser.
//!
//! Turns a raw expression into a [`FilterSet`]. Parsing goes through the
//! [`FilterExpressionParser`] trait so callers can substitute their own filter
//! syntax; [`IndexedFilterParser`] implements the `name[:ranges]` grammar.

use std::fmt;
use std::slice;
use std::str::FromStr;

use tracing::debug;

use super::error::InvalidFilterError;
use super::name::NamePattern;
use super::range::{parse_ranges, RangeSet};
use crate::types::{Example, Test};

/// A name pattern with optional example ranges.
///
/// `ranges == None` selects every example of a matching test.
#[derive(Debug, Clone)]
pub struct Filter {
    name: NamePattern,
    ranges: Option<RangeSet>,
}

impl Filter {
    /// Create a filter from its parts.
    pub fn new(name: NamePattern, ranges: Option<RangeSet>) -> Self {
        Filter { name, ranges }
    }

    /// The compiled name pattern.
    pub fn name(&self) -> &NamePattern {
        &self.name
    }

    /// The example ranges, if any were given.
    pub fn ranges(&self) -> Option<&RangeSet> {
        self.ranges.as_ref()
    }

    /// Check if a test should be run based only on its name.
    pub fn matches_test(&self, test: &Test) -> bool {
        self.name.matches(&test.name)
    }

    /// Check if an example should be run based on its index.
    ///
    /// Assumes [`matches_test`](Self::matches_test) already held for the
    /// test owning `example`.
    pub fn matches_example(&self, example: &Example) -> bool {
        self.matches_index(example.index)
    }

    /// Check an example index against the ranges.
    pub fn matches_index(&self, index: usize) -> bool {
        match &self.ranges {
            None => true,
            Some(ranges) => ranges.contains(index),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ranges {
            None => write!(f, "{}", self.name),
            Some(ranges) => write!(f, "{}:{}", self.name, ranges),
        }
    }
}

impl FromStr for Filter {
    type Err = InvalidFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndexedFilterParser.parse_filter(s)
    }
}

/// The filters parsed from one expression, in expression order.
///
/// An empty set means "no filtering": every test and example is selected.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// Create a set from its filters.
    pub fn new(filters: Vec<Filter>) -> Self {
        FilterSet { filters }
    }

    /// The set that selects everything.
    pub fn empty() -> Self {
        FilterSet::default()
    }

    /// Returns true if the set holds no filters (select everything).
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// The filters in expression order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Iterate over the filters in expression order.
    pub fn iter(&self) -> slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    /// The filters whose name pattern matches `test`.
    pub fn matching(&self, test: &Test) -> Vec<&Filter> {
        self.filters
            .iter()
            .filter(|filter| filter.matches_test(test))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, filter) in self.filters.iter().enumerate() {
            if position > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}

impl FromStr for FilterSet {
    type Err = InvalidFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_expression(s)
    }
}

/// Parses a filter expression into a [`FilterSet`].
///
/// An expression is a list of filters that are parsed individually and
/// collected in order. Implementors provide [`parse_filter`](Self::parse_filter);
/// splitting and collecting have default implementations.
pub trait FilterExpressionParser {
    /// Split the expression into the texts of individual filters.
    ///
    /// The default splits on runs of whitespace. A blank expression yields
    /// no filters.
    fn split_filter_texts<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_whitespace().collect()
    }

    /// Parse the text of a single filter.
    fn parse_filter(&self, text: &str) -> Result<Filter, InvalidFilterError>;

    /// Parse a whole expression. Fails on the first invalid filter.
    fn parse_filters(&self, text: &str) -> Result<FilterSet, InvalidFilterError> {
        let filters = self
            .split_filter_texts(text)
            .into_iter()
            .map(|filter_text| self.parse_filter(filter_text))
            .collect::<Result<Vec<_>, _>>()?;

        let filters = FilterSet::new(filters);
        debug!(count = filters.len(), expression = %filters, "parsed filter expression");
        Ok(filters)
    }
}

/// Parser for `name[:ranges]` filters.
///
/// - Each filter must have a name suffix specifier
/// - Name specifiers can have `*` inside them to match any sub-string
/// - The name can not be empty or only `*`
/// - An optional index specifier limits which examples are run
///
/// Examples of understood filters: `method`, `group_of_*_methods`,
/// `specific.module.*.method`, `method*`, `method:5`, `method:2-5`,
/// `method:2-`, `method:-5`, `method:-3,5-10,15-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedFilterParser;

impl IndexedFilterParser {
    /// Split a filter into its name specifier and optional index specifier.
    ///
    /// # Errors
    ///
    /// Returns `TooManyParts` if the filter has more than one `:`.
    pub fn split_parts(text: &str) -> Result<(&str, Option<&str>), InvalidFilterError> {
        let text = text.trim();
        let parts: Vec<&str> = text.split(':').collect();
        match parts.as_slice() {
            [name] => Ok((*name, None)),
            [name, ranges] => Ok((*name, Some(*ranges))),
            _ => Err(InvalidFilterError::TooManyParts {
                filter: text.to_string(),
                parts: parts.len(),
            }),
        }
    }
}

impl FilterExpressionParser for IndexedFilterParser {
    fn parse_filter(&self, text: &str) -> Result<Filter, InvalidFilterError> {
        let (name_text, ranges_text) = IndexedFilterParser::split_parts(text)?;

        let name = NamePattern::compile(name_text).map_err(|err| match err {
            InvalidFilterError::EmptyName { .. } => InvalidFilterError::EmptyName {
                filter: text.trim().to_string(),
            },
            other => other,
        })?;
        let ranges = ranges_text.map(parse_ranges).transpose()?;

        Ok(Filter::new(name, ranges))
    }
}

/// Parse a filter expression with the default [`IndexedFilterParser`].
///
/// # Examples
///
/// ```
/// use docsel_core::filter::parse_expression;
///
/// let filters = parse_expression("  method:10-20,7   part_a.*method ").unwrap();
/// assert_eq!(filters.to_string(), "method:10-20,7 part_a.*method");
///
/// assert!(parse_expression("method:1:2").is_err());
/// ```
pub fn parse_expression(text: &str) -> Result<FilterSet, InvalidFilterError> {
    IndexedFilterParser.parse_filters(text)
}
