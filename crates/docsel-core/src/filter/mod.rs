//! Filter expressions for selecting tests and examples.
//!
//! A filter expression is a whitespace-separated list of filters. Each filter
//! names the tests it applies to and, optionally, which examples to keep.
//!
//! ## Grammar
//!
//! ```text
//! <expression> := <filter> (WS+ <filter>)*
//! <filter>     := <name> [":" <ranges>]
//! <ranges>     := <range> ("," <range>)*
//! <range>      := "" | "-" | N | N "-" | "-" M | N "-" M
//! ```
//!
//! Names are matched against the end of the fully-qualified test name, and
//! `*` matches any run of characters. Ranges are inclusive and 0-based.
//!
//! ## Examples
//!
//! ```text
//! method                  # every example of tests ending in `method`
//! group_of_*_methods      # wildcard inside the name
//! specific.module.*.method
//! method:5                # only example 5
//! method:2-5              # examples 2 to 5
//! method:-3,5-10,15-      # a combination of ranges
//! ```
//!
//! ## Usage
//!
//! ```
//! use docsel_core::filter::parse_expression;
//!
//! let filters = parse_expression("method:10-20,7 other_method").unwrap();
//! assert_eq!(filters.len(), 2);
//!
//! // An empty expression selects everything
//! assert!(parse_expression("   ").unwrap().is_empty());
//! ```

mod error;
mod name;
mod parser;
mod range;

pub use error::InvalidFilterError;
pub use name::NamePattern;
pub use parser::{
    parse_expression, Filter, FilterExpressionParser, FilterSet, IndexedFilterParser,
};
pub use range::{parse_number, parse_range, parse_ranges, IndexRange, RangeSet};
