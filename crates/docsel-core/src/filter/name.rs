//! Name patterns: suffix matching of fully-qualified test names.
//!
//! A name specifier is literal text with optional `*` wildcards. It matches
//! the right-hand end of a dotted name, so `method` matches
//! `module.Class.method` (and `module.Class.plus_method`), but not
//! `module.Class.method_plus`.

use std::fmt;

use regex::Regex;

use super::error::InvalidFilterError;

/// A compiled matcher over fully-qualified test names.
#[derive(Debug, Clone)]
pub struct NamePattern {
    /// The specifier as written by the user (trimmed).
    text: String,
    regex: Regex,
}

impl NamePattern {
    /// Compile a name specifier.
    ///
    /// The specifier is split into literal segments at runs of `*`. Each
    /// segment is escaped, segments are joined by "any characters", and an
    /// implicit leading wildcard makes the pattern match name suffixes. Only
    /// the end of the name is anchored.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` if the specifier has no literal text, i.e. it is
    /// empty or consists only of `*`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docsel_core::filter::NamePattern;
    ///
    /// let pattern = NamePattern::compile("part_a.*method").unwrap();
    /// assert!(pattern.matches("part_a.TypeA.method"));
    /// assert!(!pattern.matches("part_b.TypeA.method"));
    ///
    /// assert!(NamePattern::compile("**").is_err());
    /// ```
    pub fn compile(text: &str) -> Result<Self, InvalidFilterError> {
        let text = text.trim();
        if text.chars().all(|c| c == '*') {
            return Err(InvalidFilterError::EmptyName {
                filter: text.to_string(),
            });
        }

        let source = suffix_regex_source(text);
        let regex = Regex::new(&source).map_err(|e| InvalidFilterError::InvalidPattern {
            pattern: text.to_string(),
            message: e.to_string(),
        })?;

        Ok(NamePattern {
            text: text.to_string(),
            regex,
        })
    }

    /// Returns true if `name` ends with text matching this pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The specifier this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build the regex source for a specifier: `.*seg1.*seg2$`.
fn suffix_regex_source(text: &str) -> String {
    // Implicit leading `*`
    let mut source = String::from(".*");
    let mut after_wildcard = true;

    for (position, segment) in text.split('*').enumerate() {
        if position > 0 && !after_wildcard {
            source.push_str(".*");
            after_wildcard = true;
        }
        if !segment.is_empty() {
            source.push_str(&regex::escape(segment));
            after_wildcard = false;
        }
    }

    source.push('$');
    source
}
