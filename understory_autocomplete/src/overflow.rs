// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrolling an overflowing choice list.

use kurbo::Rect;

/// Returns the scroll offset that brings `item` within `margin` of the viewport edges.
///
/// `item` is in content coordinates (y grows downward). The viewport moves
/// by the minimum amount: upward if the item's top is closer than `margin` to
/// the viewport top, downward if its bottom is closer than `margin` to the
/// viewport bottom, otherwise not at all. The result is clamped to
/// `0..=content_height - viewport_height`.
#[must_use]
pub fn scroll_into_view(
    item: Rect,
    scroll: f64,
    viewport_height: f64,
    content_height: f64,
    margin: f64,
) -> f64 {
    let top = scroll;
    let bottom = scroll + viewport_height;
    let target = if item.y0 - margin < top {
        item.y0 - margin
    } else if item.y1 + margin > bottom {
        item.y1 + margin - viewport_height
    } else {
        scroll
    };
    let max = (content_height - viewport_height).max(0.0);
    target.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::scroll_into_view;
    use kurbo::Rect;

    fn row(i: usize) -> Rect {
        let y = i as f64 * 20.0;
        Rect::new(0.0, y, 100.0, y + 20.0)
    }

    #[test]
    fn visible_item_does_not_scroll() {
        assert_eq!(scroll_into_view(row(2), 0.0, 100.0, 240.0, 10.0), 0.0);
    }

    #[test]
    fn scrolls_down_by_minimum_plus_margin() {
        // Row 9 spans 180..200; viewport 0..100 must end at 210.
        assert_eq!(scroll_into_view(row(9), 0.0, 100.0, 240.0, 10.0), 110.0);
    }

    #[test]
    fn scrolls_up_and_clamps_at_start() {
        assert_eq!(scroll_into_view(row(3), 110.0, 100.0, 240.0, 10.0), 50.0);
        assert_eq!(scroll_into_view(row(0), 110.0, 100.0, 240.0, 10.0), 0.0);
    }

    #[test]
    fn clamps_at_content_end() {
        // Row 11 spans 220..240; 240 + 10 - 100 = 150 exceeds max of 140.
        assert_eq!(scroll_into_view(row(11), 0.0, 100.0, 240.0, 10.0), 140.0);
    }
}
