// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active query extraction for single- and multi-value fields.

use core::ops::Range;

use regex::Regex;
use smallvec::SmallVec;

use crate::util::floor_boundary;
use crate::{Error, Result};

/// Separator configuration for multi-value fields.
///
/// `split` is a regular expression used to cut the field into tokens;
/// `join` is the literal text placed between tokens when the field is
/// rewritten.
#[derive(Clone, Debug)]
pub struct Separator {
    split: Regex,
    join: String,
}

impl Separator {
    /// Default split pattern: a comma or semicolon with surrounding whitespace.
    pub const DEFAULT_SPLIT: &'static str = r"\s*[,;]\s*";

    /// Default join text.
    pub const DEFAULT_JOIN: &'static str = ", ";

    /// Compiles a separator.
    ///
    /// Fails if `split` is not a valid pattern or can match the empty string.
    pub fn new(split: &str, join: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(split).map_err(|source| Error::InvalidSeparator {
            pattern: split.to_owned(),
            source,
        })?;
        if regex.is_match("") {
            return Err(Error::EmptySeparatorMatch {
                pattern: split.to_owned(),
            });
        }
        Ok(Self {
            split: regex,
            join: join.into(),
        })
    }

    /// Returns the join text.
    #[must_use]
    pub fn join_str(&self) -> &str {
        &self.join
    }

    /// Returns the split pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.split.as_str()
    }

    /// Splits `text` into its raw (untrimmed) tokens.
    pub fn split<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        self.split.split(text)
    }

    /// Returns the byte length of the token starting at `start`, up to the next separator.
    #[must_use]
    pub fn token_len_at(&self, text: &str, start: usize) -> usize {
        let rest = &text[floor_boundary(text, start)..];
        self.split.find(rest).map_or(rest.len(), |m| m.start())
    }

    /// Byte spans of every token in `text`, separators excluded.
    ///
    /// There is always one more span than there are separator matches.
    fn segments(&self, text: &str) -> SmallVec<[Range<usize>; 8]> {
        let mut spans = SmallVec::new();
        let mut start = 0;
        for m in self.split.find_iter(text) {
            spans.push(start..m.start());
            start = m.end();
        }
        spans.push(start..text.len());
        spans
    }
}

/// How the field's text maps to an active query.
#[derive(Clone, Debug)]
pub enum QueryMode {
    /// The whole field is the query.
    Single,
    /// The field holds several tokens; the one under the caret is the query.
    Multiple(Separator),
}

impl QueryMode {
    /// Returns the separator in multi-value mode.
    #[must_use]
    pub fn separator(&self) -> Option<&Separator> {
        match self {
            Self::Single => None,
            Self::Multiple(sep) => Some(sep),
        }
    }
}

/// The active query: a substring of the field text and where it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    /// The query text.
    pub value: String,
    /// Byte offset of the query within the field text.
    pub index: usize,
}

impl Query {
    /// Byte offset one past the end of the query.
    #[must_use]
    pub fn end(&self) -> usize {
        self.index + self.value.len()
    }

    /// Length of the query in characters, as compared against `minLength`.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Computes the active query for `text` with the caret at byte offset `caret`.
///
/// In multi-value mode the active token is the one whose preceding separators
/// all start before the caret; the whole token (not only the part before the
/// caret) is the query.
#[must_use]
pub fn extract_query(text: &str, caret: usize, mode: &QueryMode) -> Query {
    let sep = match mode {
        QueryMode::Single => {
            return Query {
                value: text.to_owned(),
                index: 0,
            };
        }
        QueryMode::Multiple(sep) => sep,
    };
    let caret = floor_boundary(text, caret);
    let spans = sep.segments(text);
    let active = sep
        .split
        .find_iter(text)
        .take_while(|m| m.start() < caret)
        .count();
    let span = spans[active.min(spans.len() - 1)].clone();
    Query {
        value: text[span.clone()].to_owned(),
        index: span.start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi() -> QueryMode {
        QueryMode::Multiple(Separator::new(Separator::DEFAULT_SPLIT, ", ").unwrap())
    }

    #[test]
    fn single_mode_uses_whole_text() {
        let q = extract_query("red, gr", 3, &QueryMode::Single);
        assert_eq!(q.value, "red, gr");
        assert_eq!(q.index, 0);
    }

    #[test]
    fn multi_mode_takes_token_under_caret() {
        let q = extract_query("red, gr", 7, &multi());
        assert_eq!(q.value, "gr");
        assert_eq!(q.index, 5);

        let q = extract_query("red, gr", 1, &multi());
        assert_eq!(q.value, "red");
        assert_eq!(q.index, 0);
    }

    #[test]
    fn caret_inside_separator_selects_following_token() {
        // Caret right after the comma: the comma starts before the caret.
        let q = extract_query("red, gr", 4, &multi());
        assert_eq!(q.value, "gr");
        assert_eq!(q.index, 5);

        // Caret right before the comma still belongs to "red".
        let q = extract_query("red, gr", 3, &multi());
        assert_eq!(q.value, "red");
    }

    #[test]
    fn trailing_separator_yields_empty_query_at_end() {
        let text = "red, green, ";
        let q = extract_query(text, text.len(), &multi());
        assert_eq!(q.value, "");
        assert_eq!(q.index, text.len());
    }

    #[test]
    fn query_stays_within_text() {
        let mode = multi();
        let text = "a; bb ,ccc,, d";
        for caret in 0..=text.len() + 2 {
            let q = extract_query(text, caret, &mode);
            assert!(q.end() <= text.len(), "caret {caret} produced {q:?}");
            assert_eq!(&text[q.index..q.end()], q.value);
        }
    }

    #[test]
    fn separator_validation() {
        assert!(matches!(
            Separator::new("(", ", "),
            Err(Error::InvalidSeparator { .. })
        ));
        assert!(matches!(
            Separator::new(",?", ", "),
            Err(Error::EmptySeparatorMatch { .. })
        ));
    }

    #[test]
    fn token_len_stops_at_separator() {
        let sep = Separator::new(Separator::DEFAULT_SPLIT, ", ").unwrap();
        assert_eq!(sep.token_len_at("red, green; blue", 5), 5);
        assert_eq!(sep.token_len_at("red, green; blue", 12), 4);
    }
}
