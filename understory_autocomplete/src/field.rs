// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bound text input, as seen by the engine.

use core::ops::Range;

use crate::util::floor_boundary;

/// A single-line text input with a selection.
///
/// Offsets are byte offsets into [`TextField::text`] and lie on char
/// boundaries. Setting the text moves the caret to its end, as native inputs
/// do.
pub trait TextField {
    /// Current text.
    fn text(&self) -> &str;

    /// Replaces the text and moves the caret to the end.
    fn set_text(&mut self, text: &str);

    /// Current selection; a collapsed range is a caret.
    fn selection(&self) -> Range<usize>;

    /// Sets the selection.
    fn set_selection(&mut self, selection: Range<usize>);

    /// Caret position: the start of the selection.
    fn caret(&self) -> usize {
        self.selection().start
    }
}

/// An in-memory [`TextField`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selection: Range<usize>,
}

impl TextBuffer {
    /// Creates a buffer holding `text` with the caret at the end.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: end..end,
        }
    }
}

impl TextField for TextBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        let end = self.text.len();
        self.selection = end..end;
    }

    fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn set_selection(&mut self, selection: Range<usize>) {
        let start = floor_boundary(&self.text, selection.start);
        let end = floor_boundary(&self.text, selection.end).max(start);
        self.selection = start..end;
    }
}
