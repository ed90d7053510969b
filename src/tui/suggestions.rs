use std::sync::Arc;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::filter::SubstringFilter;
use crate::options::AutoCompleteOptions;
use crate::theme::ColorTheme;
use crate::tui::util::truncate_to_width;
use crate::tui::widget::{FieldRender, FieldWidget};
use crate::tui::{Insets, TextAlignment};

const SEPARATOR: char = '─';

/// The dropdown drawn below the field
///
/// Holds the rows it currently renders, which only change on [`SuggestionList::set_rows`]: the
/// field refreshes them on flush, not on every keystroke.
#[derive(Debug)]
pub struct SuggestionList {
    rows: Vec<String>,
    current: usize,
    hidden: bool,
    height: u16,
    highlight: SubstringFilter,
    /// Lines per row
    pub row_height: u16,
    /// Insets of the label inside its row
    pub label_insets: Insets,
    /// Horizontal insets of the separator line
    pub separator_insets: Insets,
    /// Alignment of the label
    pub alignment: TextAlignment,
    /// Modifiers added to the label style
    pub font: Modifier,
    /// Label foreground, overriding the theme
    pub text_color: Option<Color>,
    /// Color theme
    pub theme: Arc<ColorTheme>,
}

impl Default for SuggestionList {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            current: 0,
            hidden: true,
            height: 0,
            highlight: SubstringFilter::default(),
            row_height: 1,
            label_insets: Insets::horizontal(1, 1),
            separator_insets: Insets::default(),
            alignment: TextAlignment::default(),
            font: Modifier::empty(),
            text_color: None,
            theme: Arc::new(ColorTheme::default()),
        }
    }
}

impl SuggestionList {
    /// Replaces the rendered rows, highlighting the part matching `query`
    ///
    /// The highlighted row is clamped into the new rows.
    pub fn set_rows(&mut self, rows: &[String], query: &str) {
        self.rows = rows.to_vec();
        self.highlight = SubstringFilter::new(query);
        self.current = self.current.min(self.rows.len().saturating_sub(1));
        trace!("suggestion rows: {:?}", self.rows);
    }

    /// The rendered rows
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of rendered rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there is no row to render
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the highlighted row
    pub fn current(&self) -> usize {
        self.current
    }

    /// Whether the list was hidden
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Shows or hides the list
    pub fn set_hidden(&mut self, hidden: bool) {
        if self.hidden != hidden {
            debug!("suggestions {}", if hidden { "hidden" } else { "shown" });
        }
        self.hidden = hidden;
    }

    /// Whether anything would be drawn
    pub fn is_visible(&self) -> bool {
        !self.hidden && !self.rows.is_empty() && self.height > 0
    }

    /// Height in lines
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Sets the height in lines
    pub fn set_height(&mut self, height: u16) {
        self.height = height;
    }

    /// Moves the highlight down by `n` rows, stopping at the last one
    pub fn select_next(&mut self, n: usize) {
        if !self.rows.is_empty() {
            self.current = self.current.saturating_add(n).min(self.rows.len() - 1);
        }
    }

    /// Moves the highlight up by `n` rows, stopping at the first one
    pub fn select_previous(&mut self, n: usize) {
        self.current = self.current.saturating_sub(n);
    }

    /// Highlights the first row
    pub fn select_first(&mut self) {
        self.current = 0;
    }

    /// Highlights the last row
    pub fn select_last(&mut self) {
        self.current = self.rows.len().saturating_sub(1);
    }

    /// The styled label of row `index`
    ///
    /// Always returns a line: rows out of range give an empty one.
    pub fn row_line(&self, index: usize) -> Line<'_> {
        let Some(text) = self.rows.get(index) else {
            return Line::default();
        };
        let (base, matched) = if index == self.current {
            (self.theme.current, self.theme.current_match)
        } else {
            (self.theme.suggestion, self.theme.matched)
        };
        let base = self.label_style(base);
        let matched = self.label_style(matched);

        match self.highlight.match_range(text) {
            Some((start, end)) => Line::from(vec![
                Span::styled(&text[..start], base),
                Span::styled(&text[start..end], matched),
                Span::styled(&text[end..], base),
            ]),
            None => Line::styled(text.as_str(), base),
        }
    }

    fn label_style(&self, style: Style) -> Style {
        let style = style.add_modifier(self.font);
        match self.text_color {
            Some(fg) => style.fg(fg),
            None => style,
        }
    }

    /// Row under `position` when the list is drawn in `area`
    pub fn row_at(&self, area: Rect, position: Position) -> Option<usize> {
        if !self.is_visible() || !area.contains(position) {
            return None;
        }
        let index = usize::from((position.y - area.y) / self.row_height.max(1));
        (index < self.rows.len()).then_some(index)
    }

    /// Area of the list: directly below `field`, spanning the container minus the field's left
    /// offset on both sides, clipped to the container
    pub fn frame(field: Rect, container: Rect, height: u16) -> Rect {
        let offset = field.x.saturating_sub(container.x);
        let width = container.width.saturating_sub(offset.saturating_mul(2));
        Rect {
            x: field.x,
            y: field.bottom(),
            width,
            height,
        }
        .intersection(container)
    }

    fn render_row(&self, index: usize, row_area: Rect, buf: &mut Buffer) {
        let is_last = index + 1 == self.rows.len();
        let style = if index == self.current {
            self.theme.current
        } else {
            self.theme.suggestion
        };
        Block::default().style(style).render(row_area, buf);

        let has_separator = row_area.height > 1 && !is_last;
        let mut label_area = row_area;
        if has_separator {
            label_area.height -= 1;
        }
        let label_area = self.label_insets.apply(label_area);
        if !label_area.is_empty() {
            Paragraph::new(self.row_line(index))
                .alignment(self.alignment.into())
                .render(label_area, buf);
        }

        if has_separator {
            let insets = Insets::horizontal(self.separator_insets.left, self.separator_insets.right);
            let line_area = insets.apply(Rect {
                y: row_area.bottom() - 1,
                height: 1,
                ..row_area
            });
            let line = SEPARATOR.to_string().repeat(usize::from(line_area.width));
            buf.set_string(
                line_area.x,
                line_area.y,
                truncate_to_width(&line, usize::from(line_area.width)),
                self.theme.separator,
            );
        }
    }
}

impl FieldWidget for SuggestionList {
    fn from_options(options: &AutoCompleteOptions, theme: Arc<ColorTheme>) -> Self {
        Self {
            hidden: options.hides_when_empty,
            row_height: options.row_height.max(1),
            label_insets: options.label_insets,
            separator_insets: options.separator_insets,
            alignment: options.alignment,
            font: options.font.0,
            text_color: options.text_color,
            theme,
            ..Default::default()
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) -> FieldRender {
        if !self.is_visible() || area.is_empty() {
            return FieldRender::default();
        }
        Clear.render(area, buf);
        Block::default().style(self.theme.suggestion).render(area, buf);

        let row_height = self.row_height.max(1);
        for index in 0..self.rows.len() {
            let Ok(offset) = u16::try_from(index) else {
                break;
            };
            let y = area.y.saturating_add(offset.saturating_mul(row_height));
            if y >= area.bottom() {
                break;
            }
            let row_area = Rect {
                y,
                height: row_height.min(area.bottom() - y),
                ..area
            };
            self.render_row(index, row_area, buf);
        }
        FieldRender {
            list_drawn: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn list(rows: &[&str]) -> SuggestionList {
        let mut list = SuggestionList::default();
        list.set_rows(&strings(rows), "");
        list.set_hidden(false);
        list.set_height(10);
        list
    }

    #[test]
    fn row_line_out_of_range_is_empty() {
        let list = list(&["Apple"]);
        assert_eq!(list.row_line(0).to_string(), "Apple");
        assert_eq!(list.row_line(1), Line::default());
        assert_eq!(SuggestionList::default().row_line(0), Line::default());
    }

    #[test]
    fn row_line_highlights_match() {
        let mut list = list(&[]);
        list.set_rows(&strings(&["Apricot", "Grape"]), "AP");
        let line = list.row_line(0);
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "Ap");
        assert_eq!(line.spans[1].style, list.theme.current_match);
        let line = list.row_line(1);
        assert_eq!(line.spans[1].content, "ap");
        assert_eq!(line.spans[1].style, list.theme.matched);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut list = list(&["a", "b", "c"]);
        list.select_previous(1);
        assert_eq!(list.current(), 0);
        list.select_next(5);
        assert_eq!(list.current(), 2);
        list.select_first();
        assert_eq!(list.current(), 0);
        list.select_last();
        assert_eq!(list.current(), 2);
        list.set_rows(&strings(&["a"]), "");
        assert_eq!(list.current(), 0);
    }

    #[test]
    fn frame_follows_container() {
        let field = Rect::new(2, 0, 20, 1);
        let container = Rect::new(0, 0, 30, 8);
        assert_eq!(SuggestionList::frame(field, container, 3), Rect::new(2, 1, 26, 3));
        // Clipped to the container
        assert_eq!(SuggestionList::frame(field, container, 20), Rect::new(2, 1, 26, 7));
        let moved = Rect::new(1, 0, 10, 8);
        assert_eq!(SuggestionList::frame(field, moved, 3), Rect::new(2, 1, 8, 3));
    }

    #[test]
    fn render_single_line_rows() {
        let mut list = list(&["Apple", "Apricot", "Avocado"]);
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        let res = list.render(area, &mut buf);
        assert!(res.list_drawn);
        assert_eq!(lines(&buf), vec![" Apple", " Apricot", " Avocado"]);
    }

    #[test]
    fn render_separators_between_tall_rows() {
        let mut list = list(&["Apple", "Apricot"]);
        list.row_height = 2;
        list.separator_insets = Insets::horizontal(1, 1);
        list.alignment = TextAlignment::Right;
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        list.render(area, &mut buf);
        insta::assert_debug_snapshot!(lines(&buf), @r#"
        [
            "    Apple",
            " ────────",
            "  Apricot",
            "",
        ]
        "#);
    }

    #[test]
    fn hidden_list_draws_nothing() {
        let mut list = list(&["Apple"]);
        list.set_hidden(true);
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        assert!(!list.render(area, &mut buf).list_drawn);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn row_at_maps_positions() {
        let mut list = list(&["a", "b"]);
        list.row_height = 2;
        let area = Rect::new(0, 5, 10, 4);
        assert_eq!(list.row_at(area, Position::new(3, 5)), Some(0));
        assert_eq!(list.row_at(area, Position::new(3, 8)), Some(1));
        assert_eq!(list.row_at(area, Position::new(3, 4)), None);
        list.set_hidden(true);
        assert_eq!(list.row_at(area, Position::new(3, 5)), None);
    }
}
