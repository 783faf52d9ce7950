// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate tokens and their rendered labels.

use core::hash::{Hash, Hasher};
use core::ops::Range;

/// A candidate returned by a fetch.
///
/// Equality and hashing consider only [`Token::value`]; the optional display
/// payload is used for rendering only.
#[derive(Clone, Debug, Eq)]
pub struct Token {
    /// The raw text committed into the field when this token is chosen.
    pub value: String,
    /// Optional label shown in place of the value.
    pub display: Option<String>,
}

impl Token {
    /// Creates a token without a display payload.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display: None,
        }
    }

    /// Attaches a display label.
    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Returns the text a renderer should show.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.value)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Label text with an optional highlighted byte range (the matched query).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkedText {
    /// Full label text.
    pub text: String,
    /// Byte range of the matched substring, if any.
    pub mark: Option<Range<usize>>,
}

impl MarkedText {
    /// Creates label text without a mark.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mark: None,
        }
    }

    /// Splits the text into `(before, marked, after)`.
    ///
    /// Without a mark, everything is in `before`.
    #[must_use]
    pub fn parts(&self) -> (&str, &str, &str) {
        match &self.mark {
            Some(mark) => (
                &self.text[..mark.start],
                &self.text[mark.clone()],
                &self.text[mark.end..],
            ),
            None => (&self.text, "", ""),
        }
    }
}

/// A token bound to a list entry, as handed to a [`ChoiceList`](crate::ChoiceList).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceEntry {
    /// The underlying candidate.
    pub token: Token,
    /// The label to render, with the matched query marked when enabled.
    pub label: MarkedText,
}
