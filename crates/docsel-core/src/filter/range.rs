//! Index ranges selecting examples within a test.
//!
//! A range specifier is a comma-separated list of inclusive, 0-based ranges:
//!
//! - `1` - a single example
//! - `2-5` - examples 2 to 5
//! - `-5` - up to example 5
//! - `2-` - example 2 onwards
//! - `-` or an empty segment - every example
//! - `-3,5-10,20-` - any combination of the above
//!
//! A reversed range such as `512-256` is accepted and selects nothing.

use std::fmt;
use std::str::FromStr;

use winnow::ascii::{digit1, space0};
use winnow::combinator::{alt, delimited, opt};
use winnow::prelude::*;
use winnow::ModalResult;

use super::error::InvalidFilterError;

/// An inclusive range of example indices.
///
/// `end == None` means the range is unbounded above. When `start > end` the
/// range is explicitly empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexRange {
    /// First index in the range.
    pub start: usize,
    /// Last index in the range, or `None` for no upper bound.
    pub end: Option<usize>,
}

impl IndexRange {
    /// Create a range from `start` to `end` (inclusive).
    pub fn new(start: usize, end: Option<usize>) -> Self {
        IndexRange { start, end }
    }

    /// A range holding exactly `index`.
    pub fn single(index: usize) -> Self {
        IndexRange::new(index, Some(index))
    }

    /// A range holding every index.
    pub fn all() -> Self {
        IndexRange::new(0, None)
    }

    /// Returns true if `index` lies within this range.
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && self.end.is_none_or(|end| index <= end)
    }

    /// Returns true if this range has no upper bound.
    pub fn is_unbounded(&self) -> bool {
        self.end.is_none()
    }

    /// Returns true if no index lies within this range.
    pub fn is_empty(&self) -> bool {
        matches!(self.end, Some(end) if end < self.start)
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (0, None) => write!(f, "-"),
            (start, None) => write!(f, "{start}-"),
            (start, Some(end)) if start == end => write!(f, "{start}"),
            (0, Some(end)) => write!(f, "-{end}"),
            (start, Some(end)) => write!(f, "{start}-{end}"),
        }
    }
}

impl FromStr for IndexRange {
    type Err = InvalidFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range(s)
    }
}

/// A union of inclusive index ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<IndexRange>,
}

impl RangeSet {
    /// Create a set from its ranges.
    pub fn new(ranges: Vec<IndexRange>) -> Self {
        RangeSet { ranges }
    }

    /// A set holding every index.
    pub fn all() -> Self {
        RangeSet::new(vec![IndexRange::all()])
    }

    /// The ranges in the order they were specified.
    pub fn ranges(&self) -> &[IndexRange] {
        &self.ranges
    }

    /// Returns true if `index` lies within any of the ranges.
    pub fn contains(&self, index: usize) -> bool {
        self.ranges.iter().any(|range| range.contains(index))
    }

    /// Returns true if no index lies within any of the ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.iter().all(IndexRange::is_empty)
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, range) in self.ranges.iter().enumerate() {
            if position > 0 {
                f.write_str(",")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

impl FromStr for RangeSet {
    type Err = InvalidFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_ranges(s)
    }
}

/// Parse a comma-separated range specifier.
///
/// An empty specifier yields a single range holding every index.
///
/// # Examples
///
/// ```
/// use docsel_core::filter::parse_ranges;
///
/// let ranges = parse_ranges("1,10-20,7").unwrap();
/// assert!(ranges.contains(7));
/// assert!(ranges.contains(15));
/// assert!(!ranges.contains(8));
/// ```
pub fn parse_ranges(text: &str) -> Result<RangeSet, InvalidFilterError> {
    let ranges = text
        .split(',')
        .map(parse_range)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RangeSet::new(ranges))
}

/// Parse a single range segment (no commas).
///
/// Whitespace around the segment and around each bound is ignored, so
/// `" 5 - 7 "` is the same as `"5-7"`.
///
/// # Errors
///
/// - `TooManyDashes` if the segment has more than one `-`
/// - `InvalidNumber` if a bound is not a non-negative decimal integer
pub fn parse_range(text: &str) -> Result<IndexRange, InvalidFilterError> {
    let text = text.trim();
    if text.matches('-').count() > 1 {
        return Err(InvalidFilterError::TooManyDashes {
            range: text.to_string(),
        });
    }

    index_range
        .parse(text)
        .map_err(|_| InvalidFilterError::InvalidNumber {
            text: offending_number(text).to_string(),
        })
}

/// Parse a non-negative decimal integer.
///
/// Signs, hex notation and values that do not fit in `usize` are rejected.
pub fn parse_number(text: &str) -> Result<usize, InvalidFilterError> {
    let text = text.trim();
    index.parse(text).map_err(|_| InvalidFilterError::InvalidNumber {
        text: text.to_string(),
    })
}

// ============================================================================
// Parser implementation using winnow
// ============================================================================

/// Parse `N`, `N-`, `-M`, `N-M`, `-` or nothing.
fn index_range(input: &mut &str) -> ModalResult<IndexRange> {
    alt((
        (opt(index), '-', opt(index))
            .map(|(start, _, end)| IndexRange::new(start.unwrap_or(0), end)),
        opt(index).map(|single| match single {
            Some(value) => IndexRange::single(value),
            None => IndexRange::all(),
        }),
    ))
    .parse_next(input)
}

/// Parse a run of ASCII digits as a `usize`, with optional blanks around it.
fn index(input: &mut &str) -> ModalResult<usize> {
    delimited(
        space0,
        digit1.try_map(|digits: &str| digits.parse::<usize>()),
        space0,
    )
    .parse_next(input)
}

/// Pick the part of a segment that failed to parse as a number.
fn offending_number(text: &str) -> &str {
    text.split('-')
        .map(str::trim)
        .find(|part| {
            !part.is_empty()
                && (!part.bytes().all(|b| b.is_ascii_digit()) || part.parse::<usize>().is_err())
        })
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Indices below 1010 selected by `text`, like listing the first entries
    /// of the selection.
    fn indices(text: &str) -> Vec<usize> {
        let ranges = parse_ranges(text).unwrap();
        (0..1010).filter(|&index| ranges.contains(index)).collect()
    }

    fn all_below(limit: usize) -> Vec<usize> {
        (0..limit).collect()
    }

    mod single_range {
        use super::*;

        #[test]
        fn empty_and_dash_select_everything() {
            for text in ["", "-", " - "] {
                let range = parse_range(text).unwrap();
                assert_eq!(range, IndexRange::all());
                assert!(range.contains(0));
                assert!(range.contains(usize::MAX));
            }
        }

        #[test]
        fn single_number() {
            assert_eq!(parse_range("512").unwrap(), IndexRange::single(512));
            assert_eq!(indices("512"), vec![512]);
        }

        #[test]
        fn open_start() {
            assert_eq!(parse_range("-512").unwrap(), IndexRange::new(0, Some(512)));
            assert_eq!(indices("-512"), all_below(513));
        }

        #[test]
        fn open_end() {
            let range = parse_range("512-").unwrap();
            assert!(range.is_unbounded());
            assert!(!range.contains(511));
            assert!(range.contains(512));
            assert!(range.contains(1_000_000));
        }

        #[test]
        fn closed_range_is_inclusive() {
            let range = parse_range("256-512").unwrap();
            assert!(!range.contains(255));
            assert!(range.contains(256));
            assert!(range.contains(512));
            assert!(!range.contains(513));
        }

        #[test]
        fn reversed_range_is_empty_not_an_error() {
            let range = parse_range("512-256").unwrap();
            assert!(range.is_empty());
            assert!(indices("512-256").is_empty());
        }

        #[test]
        fn too_many_dashes() {
            match parse_range("256-512-768") {
                Err(InvalidFilterError::TooManyDashes { range }) => {
                    assert_eq!(range, "256-512-768");
                }
                other => panic!("Expected TooManyDashes, got {other:?}"),
            }
        }

        #[test]
        fn blanks_around_bounds() {
            assert_eq!(parse_range("5- 7").unwrap(), IndexRange::new(5, Some(7)));
            assert_eq!(parse_range(" 5 - 7 ").unwrap(), IndexRange::new(5, Some(7)));
            assert_eq!(parse_range("- 3").unwrap(), IndexRange::new(0, Some(3)));
            assert_eq!(parse_range("4 -").unwrap(), IndexRange::new(4, None));
            assert_eq!(
                parse_ranges("1, 5- 7").unwrap(),
                RangeSet::new(vec![IndexRange::single(1), IndexRange::new(5, Some(7))])
            );
        }

        #[test]
        fn invalid_numbers() {
            for (text, offending) in [
                ("0xf", "0xf"),
                ("5-abc", "abc"),
                ("abc-5", "abc"),
                ("+5", "+5"),
                ("1.5", "1.5"),
                ("99999999999999999999999999", "99999999999999999999999999"),
                ("5 6", "5 6"),
                ("5- 1 2", "1 2"),
            ] {
                match parse_range(text) {
                    Err(InvalidFilterError::InvalidNumber { text: found }) => {
                        assert_eq!(found, offending);
                    }
                    other => panic!("Expected InvalidNumber for {text:?}, got {other:?}"),
                }
            }
        }
    }

    mod range_lists {
        use super::*;

        #[test]
        fn singles() {
            assert_eq!(indices("1,5,7"), vec![1, 5, 7]);
        }

        #[test]
        fn mixed_singles_and_ranges() {
            let mut expected = vec![1, 7];
            expected.extend(10..=20);
            assert_eq!(indices("1,10-20,7"), expected);
        }

        #[test]
        fn reversed_range_contributes_nothing() {
            assert_eq!(indices("1,20-10,7"), vec![1, 7]);
            assert_eq!(indices("1,20-10,7,10,11"), vec![1, 7, 10, 11]);
        }

        #[test]
        fn open_start_with_others() {
            let mut expected = all_below(6);
            expected.extend(10..=20);
            assert_eq!(indices("1,10-20,-5"), expected);
        }

        #[test]
        fn open_end_with_others() {
            let mut expected = all_below(6);
            expected.extend(10..=20);
            expected.extend(600..1010);
            assert_eq!(indices("600-,10-20,-5"), expected);
        }

        #[test]
        fn empty_segment_selects_everything() {
            assert_eq!(indices("600-,10-20,,-5"), all_below(1010));
        }

        #[test]
        fn one_bad_segment_fails_the_list() {
            assert!(matches!(
                parse_ranges("600-,10-20-40,,-5"),
                Err(InvalidFilterError::TooManyDashes { .. })
            ));
            assert!(matches!(
                parse_ranges("600-,10-0xf,,-5"),
                Err(InvalidFilterError::InvalidNumber { .. })
            ));
            assert!(matches!(
                parse_ranges("600-,10-abc,,-5"),
                Err(InvalidFilterError::InvalidNumber { .. })
            ));
        }

        #[test]
        fn union_of_segments() {
            let segments = ["", "-", "3", "-4", "6-", "2-5", "5-2", "0", "9-9"];
            for first in segments {
                for second in segments {
                    let combined = parse_ranges(&format!("{first},{second}")).unwrap();
                    let a = parse_range(first).unwrap();
                    let b = parse_range(second).unwrap();
                    for index in 0..16 {
                        assert_eq!(
                            combined.contains(index),
                            a.contains(index) || b.contains(index),
                            "{first},{second} at {index}"
                        );
                    }
                }
            }
        }

        #[test]
        fn set_is_empty_only_when_every_range_is_reversed() {
            assert!(parse_ranges("5-2,9-1").unwrap().is_empty());
            assert!(!parse_ranges("5-2,3").unwrap().is_empty());
        }
    }

    mod numbers {
        use super::*;

        #[test]
        fn accepts_non_negative_integers() {
            assert_eq!(parse_number("0").unwrap(), 0);
            assert_eq!(parse_number("512").unwrap(), 512);
        }

        #[test]
        fn rejects_negative_and_hex() {
            assert!(matches!(
                parse_number("-4"),
                Err(InvalidFilterError::InvalidNumber { .. })
            ));
            assert!(matches!(
                parse_number("0xf"),
                Err(InvalidFilterError::InvalidNumber { .. })
            ));
            assert!(parse_number("").is_err());
        }
    }

    mod display {
        use super::*;

        #[test]
        fn renders_each_form() {
            assert_eq!(IndexRange::all().to_string(), "-");
            assert_eq!(IndexRange::single(3).to_string(), "3");
            assert_eq!(IndexRange::new(2, None).to_string(), "2-");
            assert_eq!(IndexRange::new(0, Some(5)).to_string(), "-5");
            assert_eq!(IndexRange::new(2, Some(5)).to_string(), "2-5");
            assert_eq!(IndexRange::new(5, Some(2)).to_string(), "5-2");
        }

        #[test]
        fn rendered_set_parses_back_to_itself() {
            for text in ["-3,5-10,15-", "1,20-10,7", "", "0"] {
                let ranges: RangeSet = text.parse().unwrap();
                let reparsed: RangeSet = ranges.to_string().parse().unwrap();
                assert_eq!(reparsed, ranges);
            }
        }
    }
}
