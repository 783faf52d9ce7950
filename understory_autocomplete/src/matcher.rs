// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query matchers: the only place regular expressions are built from user text.

use core::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::{MarkedText, Result};

/// How a query is matched against tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Match case exactly (`filterCase`). Off by default.
    pub case_sensitive: bool,
    /// Allow the query anywhere in the token instead of only at its start
    /// (`filterSubset`). Off by default.
    pub subset: bool,
}

/// A compiled query matcher.
#[derive(Clone, Debug)]
pub struct Matcher {
    regex: Regex,
}

/// Compiles a matcher for `query`.
///
/// The query is escaped, so it is always matched literally. Matching is
/// anchored at the token start unless [`MatchOptions::subset`] is set, and
/// case-insensitive unless [`MatchOptions::case_sensitive`] is set.
pub fn compile_query_matcher(query: &str, options: MatchOptions) -> Result<Matcher> {
    let anchor = if options.subset { "" } else { "^" };
    let pattern = format!("{anchor}{}", regex::escape(query));
    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()?;
    Ok(Matcher { regex })
}

impl Matcher {
    /// Returns `true` if `token` matches the query.
    #[must_use]
    pub fn is_match(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    /// Byte range of the first match in `token`.
    #[must_use]
    pub fn find(&self, token: &str) -> Option<Range<usize>> {
        self.regex.find(token).map(|m| m.range())
    }

    /// Marks the matched substring of `label` for emphasis.
    ///
    /// An empty match leaves the label unmarked.
    #[must_use]
    pub fn mark(&self, label: &str) -> MarkedText {
        MarkedText {
            text: label.to_owned(),
            mark: self.find(label).filter(|range| !range.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_by_default() {
        let m = compile_query_matcher("Ab", MatchOptions::default()).unwrap();
        assert!(m.is_match("abacus"));

        let m = compile_query_matcher(
            "Ab",
            MatchOptions {
                case_sensitive: true,
                subset: false,
            },
        )
        .unwrap();
        assert!(!m.is_match("abacus"));
        assert!(m.is_match("Abacus"));
    }

    #[test]
    fn anchored_unless_subset() {
        let prefix = compile_query_matcher("cus", MatchOptions::default()).unwrap();
        assert!(!prefix.is_match("abacus"));

        let subset = compile_query_matcher(
            "cus",
            MatchOptions {
                case_sensitive: false,
                subset: true,
            },
        )
        .unwrap();
        assert!(subset.is_match("abacus"));
    }

    #[test]
    fn special_characters_are_literal() {
        let m = compile_query_matcher("c++ (", MatchOptions::default()).unwrap();
        assert!(m.is_match("C++ (ISO)"));
        assert!(!m.is_match("cpp"));

        let dot = compile_query_matcher("a.c", MatchOptions::default()).unwrap();
        assert!(!dot.is_match("abc"));
    }

    #[test]
    fn mark_preserves_original_case() {
        let m = compile_query_matcher(
            "CUS",
            MatchOptions {
                case_sensitive: false,
                subset: true,
            },
        )
        .unwrap();
        let marked = m.mark("Abacus");
        assert_eq!(marked.parts(), ("Aba", "cus", ""));

        let empty = compile_query_matcher("", MatchOptions::default()).unwrap();
        assert_eq!(empty.mark("Abacus").mark, None);
    }
}
