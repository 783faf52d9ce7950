// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The choice list collaborator and a headless fixed-row implementation.

use kurbo::Rect;

use crate::{ChoiceEntry, Token};

/// The visual list of choices, as driven by the engine.
///
/// Renderers own entry creation, styling and placement. The engine only needs
/// to rebuild the entries, move the highlight, toggle visibility, and scroll an
/// overflowing viewport. Entry bounds are reported in the list's content
/// coordinates (y grows downward, `0.0` is the top of the first entry).
pub trait ChoiceList {
    /// Removes every entry.
    fn clear(&mut self);

    /// Appends an entry.
    fn push(&mut self, entry: ChoiceEntry);

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Token bound to entry `index`.
    fn token(&self, index: usize) -> Option<&Token>;

    /// Bounds of entry `index` in content coordinates.
    fn bounds(&self, index: usize) -> Option<Rect>;

    /// Marks entry `index` as highlighted, clearing any previous highlight.
    fn set_highlighted(&mut self, index: Option<usize>);

    /// Shows or hides the list.
    fn set_visible(&mut self, visible: bool);

    /// Constrains the list to a scrolling viewport, or lets it size to content.
    fn set_viewport_height(&mut self, height: Option<f64>);

    /// Current viewport height, if the list is constrained.
    fn viewport_height(&self) -> Option<f64>;

    /// Current scroll offset of the viewport.
    fn scroll_offset(&self) -> f64;

    /// Sets the scroll offset of the viewport.
    fn set_scroll_offset(&mut self, offset: f64);

    /// First entry accepted by `eligible`.
    fn first_eligible(&self, eligible: &dyn Fn(&Token) -> bool) -> Option<usize> {
        (0..self.len()).find(|&i| self.token(i).is_some_and(|t| eligible(t)))
    }

    /// Last entry accepted by `eligible`.
    fn last_eligible(&self, eligible: &dyn Fn(&Token) -> bool) -> Option<usize> {
        (0..self.len())
            .rev()
            .find(|&i| self.token(i).is_some_and(|t| eligible(t)))
    }

    /// First entry after `index` accepted by `eligible`.
    fn next_eligible(&self, index: usize, eligible: &dyn Fn(&Token) -> bool) -> Option<usize> {
        (index + 1..self.len()).find(|&i| self.token(i).is_some_and(|t| eligible(t)))
    }

    /// Last entry before `index` accepted by `eligible`.
    fn previous_eligible(&self, index: usize, eligible: &dyn Fn(&Token) -> bool) -> Option<usize> {
        (0..index.min(self.len()))
            .rev()
            .find(|&i| self.token(i).is_some_and(|t| eligible(t)))
    }

    /// Every entry accepted by `eligible`, in order.
    fn eligible_indices(&self, eligible: &dyn Fn(&Token) -> bool) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.token(i).is_some_and(|t| eligible(t)))
            .collect()
    }
}

/// A headless [`ChoiceList`] whose entries are stacked rows of equal height.
///
/// Useful for hosts that render rows of uniform height themselves, and for
/// tests.
#[derive(Clone, Debug)]
pub struct FixedRowList {
    entries: Vec<ChoiceEntry>,
    row_height: f64,
    width: f64,
    highlighted: Option<usize>,
    visible: bool,
    viewport_height: Option<f64>,
    scroll_offset: f64,
}

impl FixedRowList {
    /// Creates an empty, hidden list. Negative sizes are clamped to zero.
    #[must_use]
    pub fn new(row_height: f64, width: f64) -> Self {
        Self {
            entries: Vec::new(),
            row_height: row_height.max(0.0),
            width: width.max(0.0),
            highlighted: None,
            visible: false,
            viewport_height: None,
            scroll_offset: 0.0,
        }
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[ChoiceEntry] {
        &self.entries
    }

    /// Token values in display order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.token.value.as_str()).collect()
    }

    /// Highlighted entry, if any.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Whether the list is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Total height of all rows.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.row_height * self.entries.len() as f64
    }
}

impl ChoiceList for FixedRowList {
    fn clear(&mut self) {
        self.entries.clear();
        self.highlighted = None;
        self.scroll_offset = 0.0;
    }

    fn push(&mut self, entry: ChoiceEntry) {
        self.entries.push(entry);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn token(&self, index: usize) -> Option<&Token> {
        self.entries.get(index).map(|e| &e.token)
    }

    fn bounds(&self, index: usize) -> Option<Rect> {
        if index >= self.entries.len() {
            return None;
        }
        let y0 = self.row_height * index as f64;
        Some(Rect::new(0.0, y0, self.width, y0 + self.row_height))
    }

    fn set_highlighted(&mut self, index: Option<usize>) {
        self.highlighted = index.filter(|&i| i < self.entries.len());
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_viewport_height(&mut self, height: Option<f64>) {
        self.viewport_height = height.map(|h| h.max(0.0));
    }

    fn viewport_height(&self) -> Option<f64> {
        self.viewport_height
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        let max = match self.viewport_height {
            Some(viewport) => (self.content_height() - viewport).max(0.0),
            None => 0.0,
        };
        self.scroll_offset = offset.clamp(0.0, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkedText;

    fn list(values: &[&str]) -> FixedRowList {
        let mut list = FixedRowList::new(20.0, 100.0);
        for v in values {
            list.push(ChoiceEntry {
                token: Token::new(*v),
                label: MarkedText::plain(*v),
            });
        }
        list
    }

    fn not_b(t: &Token) -> bool {
        !t.value.starts_with('b')
    }

    #[test]
    fn eligible_navigation_skips_rejected_entries() {
        let l = list(&["a1", "b1", "a2", "b2"]);
        assert_eq!(l.first_eligible(&not_b), Some(0));
        assert_eq!(l.last_eligible(&not_b), Some(2));
        assert_eq!(l.next_eligible(0, &not_b), Some(2));
        assert_eq!(l.next_eligible(2, &not_b), None);
        assert_eq!(l.previous_eligible(2, &not_b), Some(0));
        assert_eq!(l.previous_eligible(0, &not_b), None);
        assert_eq!(l.eligible_indices(&not_b), [0, 2]);
    }

    #[test]
    fn rows_stack_vertically() {
        let l = list(&["a", "b", "c"]);
        assert_eq!(l.bounds(1), Some(Rect::new(0.0, 20.0, 100.0, 40.0)));
        assert_eq!(l.bounds(3), None);
        assert_eq!(l.content_height(), 60.0);
    }

    #[test]
    fn scroll_offset_is_clamped_to_content() {
        let mut l = list(&["a", "b", "c", "d"]);
        l.set_scroll_offset(30.0);
        assert_eq!(l.scroll_offset(), 0.0, "unconstrained lists do not scroll");

        l.set_viewport_height(Some(40.0));
        l.set_scroll_offset(100.0);
        assert_eq!(l.scroll_offset(), 40.0);
    }
}
