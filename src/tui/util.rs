use unicode_display_width::is_double_width;

#[inline]
pub fn char_display_width(c: char) -> usize {
    if c == '\u{FE0F}' || is_double_width(c) {
        return 2;
    }
    1
}

pub fn str_display_width(s: &str) -> usize {
    s.chars().map(char_display_width).sum()
}

/// Longest prefix of `s` that fits in `width` columns
pub fn truncate_to_width(s: &str, width: usize) -> &str {
    let mut w = 0;
    for (i, c) in s.char_indices() {
        w += char_display_width(c);
        if w > width {
            return &s[..i];
        }
    }
    s
}
