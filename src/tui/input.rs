use std::ops::Deref;
use std::sync::Arc;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::options::AutoCompleteOptions;
use crate::theme::ColorTheme;
use crate::tui::util::str_display_width;
use crate::tui::widget::{FieldRender, FieldWidget};

/// Single line text input with a prompt
///
/// The cursor is a byte offset into `value` and always sits on a char boundary.
#[derive(Debug)]
pub struct TextField {
    /// Displayed before the text
    pub prompt: String,
    value: String,
    cursor: usize,
    /// Color theme
    pub theme: Arc<ColorTheme>,
    /// Whether to draw a border around the field
    pub border: bool,
}

impl Default for TextField {
    fn default() -> Self {
        Self {
            prompt: String::from("> "),
            value: String::default(),
            cursor: 0,
            theme: Arc::new(ColorTheme::default()),
            border: false,
        }
    }
}

impl TextField {
    /// The current text
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Byte offset of the cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the whole text and puts the cursor at the end
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
    }

    /// Inserts a char at the cursor
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Inserts a string at the cursor
    pub fn insert_str(&mut self, s: &str) {
        self.value.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    fn prev_boundary(&self, pos: usize) -> Option<usize> {
        self.value[..pos].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self, pos: usize) -> Option<usize> {
        self.value[pos..].chars().next().map(|c| pos + c.len_utf8())
    }

    /// Deletes the char before the cursor
    pub fn delete_backward(&mut self) -> Option<char> {
        let pos = self.prev_boundary(self.cursor)?;
        self.cursor = pos;
        Some(self.value.remove(pos))
    }

    /// Deletes the char under the cursor
    pub fn delete_forward(&mut self) -> Option<char> {
        if self.cursor >= self.value.len() {
            return None;
        }
        Some(self.value.remove(self.cursor))
    }

    /// Moves the cursor one char left
    pub fn move_backward(&mut self) {
        if let Some(pos) = self.prev_boundary(self.cursor) {
            self.cursor = pos;
        }
    }

    /// Moves the cursor one char right
    pub fn move_forward(&mut self) {
        if let Some(pos) = self.next_boundary(self.cursor) {
            self.cursor = pos;
        }
    }

    /// Moves the cursor before the first char
    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor after the last char
    pub fn move_to_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Start of the word before `pos`, words being alphanumeric runs
    fn find_prev_word_start(&self, pos: usize) -> usize {
        let mut start = pos;
        let mut seen_word = false;
        for (i, ch) in self.value[..pos].char_indices().rev() {
            if ch.is_alphanumeric() {
                seen_word = true;
            } else if seen_word {
                break;
            }
            start = i;
        }
        start
    }

    /// End of the word after `pos`, words being whitespace separated
    fn find_next_word_end(&self, pos: usize) -> usize {
        let mut end = pos;
        let mut seen_word = false;
        for (i, ch) in self.value[pos..].char_indices() {
            if !ch.is_whitespace() {
                seen_word = true;
            } else if seen_word {
                break;
            }
            end = pos + i + ch.len_utf8();
        }
        end
    }

    fn remove_range(&mut self, start: usize, end: usize) -> String {
        let deleted: String = self.value.drain(start..end).collect();
        self.cursor = start;
        deleted
    }

    /// Alt+Backspace: delete back to the start of the previous alphanumeric word
    pub fn delete_backward_word(&mut self) -> String {
        let start = self.find_prev_word_start(self.cursor);
        self.remove_range(start, self.cursor)
    }

    /// Ctrl+W: delete back to the previous whitespace
    pub fn delete_backward_to_whitespace(&mut self) -> String {
        let before = &self.value[..self.cursor];
        let trimmed = before.trim_end_matches(char::is_whitespace);
        let start = trimmed.rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0);
        self.remove_range(start, self.cursor)
    }

    /// Deletes everything before the cursor
    pub fn delete_to_beginning(&mut self) -> String {
        self.remove_range(0, self.cursor)
    }

    /// Deletes everything from the cursor on
    pub fn delete_to_end(&mut self) -> String {
        self.value.split_off(self.cursor)
    }

    /// Moves to the start of the previous word
    pub fn move_backward_word(&mut self) {
        self.cursor = self.find_prev_word_start(self.cursor);
    }

    /// Moves to the end of the next word
    pub fn move_forward_word(&mut self) {
        self.cursor = self.find_next_word_end(self.cursor);
    }

    /// Height the field needs, borders included
    pub fn height(&self) -> u16 {
        if self.border { 3 } else { 1 }
    }

    /// Column of the cursor relative to the field's area
    pub fn cursor_column(&self) -> u16 {
        let width = str_display_width(&self.value[..self.cursor]) + str_display_width(&self.prompt);
        let offset = if self.border { 1 } else { 0 };
        u16::try_from(width).unwrap_or(u16::MAX).saturating_add(offset)
    }
}

impl FieldWidget for TextField {
    fn from_options(options: &AutoCompleteOptions, theme: Arc<ColorTheme>) -> Self {
        let mut res = Self {
            prompt: options.prompt.clone(),
            theme,
            border: options.border,
            ..Default::default()
        };
        res.set_value(options.query.as_deref().unwrap_or_default());
        res
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) -> FieldRender {
        let mut block = Block::default();
        if self.border {
            block = block.borders(Borders::ALL).border_style(self.theme.border);
        }
        let line = Line::from(vec![
            Span::styled(&self.prompt, self.theme.prompt),
            Span::styled(&self.value, self.theme.query),
        ]);
        Paragraph::new(line)
            .block(block)
            .style(self.theme.normal)
            .render(area, buf);

        let y = area.y + if self.border { 1 } else { 0 };
        FieldRender {
            cursor: Some(Position::new(area.x.saturating_add(self.cursor_column()), y)),
            ..Default::default()
        }
    }
}

impl Deref for TextField {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: &str) -> TextField {
        let mut f = TextField::default();
        f.set_value(value);
        f
    }

    #[test]
    fn insert_and_delete_multibyte() {
        let mut f = field("");
        f.insert('é');
        f.insert('a');
        assert_eq!(f.value(), "éa");
        assert_eq!(f.cursor(), 3);
        f.move_backward();
        assert_eq!(f.delete_backward(), Some('é'));
        assert_eq!(f.value(), "a");
        assert_eq!(f.cursor(), 0);
        assert_eq!(f.delete_backward(), None);
        assert_eq!(f.delete_forward(), Some('a'));
        assert!(f.is_empty());
    }

    #[test]
    fn cursor_motion_stays_in_bounds() {
        let mut f = field("ab");
        f.move_forward();
        assert_eq!(f.cursor(), 2);
        f.move_to_start();
        f.move_backward();
        assert_eq!(f.cursor(), 0);
        f.insert_str("xy");
        assert_eq!(f.value(), "xyab");
        assert_eq!(f.cursor(), 2);
    }

    #[test]
    fn word_deletions() {
        let mut f = field("foo bar-baz");
        assert_eq!(f.delete_backward_word(), "baz");
        assert_eq!(f.value(), "foo bar-");
        assert_eq!(f.delete_backward_to_whitespace(), "bar-");
        assert_eq!(f.value(), "foo ");
        assert_eq!(f.delete_backward_to_whitespace(), "foo ");
        assert!(f.is_empty());
    }

    #[test]
    fn word_motion() {
        let mut f = field("one two");
        f.move_backward_word();
        assert_eq!(f.cursor(), 4);
        f.move_backward_word();
        assert_eq!(f.cursor(), 0);
        f.move_forward_word();
        assert_eq!(f.cursor(), 3);
        f.move_forward_word();
        assert_eq!(f.cursor(), 7);
    }

    #[test]
    fn line_kills() {
        let mut f = field("hello world");
        f.move_to_start();
        f.move_forward_word();
        assert_eq!(f.delete_to_end(), " world");
        assert_eq!(f.value(), "hello");
        f.move_backward();
        assert_eq!(f.delete_to_beginning(), "hell");
        assert_eq!(f.value(), "o");
        assert_eq!(f.cursor(), 0);
    }

    #[test]
    fn cursor_column_counts_prompt_and_border() {
        let mut f = field("ab");
        assert_eq!(f.cursor_column(), 4);
        f.border = true;
        assert_eq!(f.cursor_column(), 5);
        assert_eq!(f.height(), 3);
    }
}
