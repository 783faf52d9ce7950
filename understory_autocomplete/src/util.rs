// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small helpers for byte offsets into UTF-8 text.

/// Clamps `index` to `text.len()` and moves it back to the nearest char boundary.
pub(crate) fn floor_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::floor_boundary;

    #[test]
    fn floors_inside_multibyte_chars() {
        // "é" is two bytes.
        assert_eq!(floor_boundary("é!", 1), 0);
        assert_eq!(floor_boundary("é!", 2), 2);
        assert_eq!(floor_boundary("é!", 99), 3);
    }
}
