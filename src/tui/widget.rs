use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use std::ops::BitOrAssign;
use std::sync::Arc;

use crate::options::AutoCompleteOptions;
use crate::theme::ColorTheme;

/// Result of rendering a FieldWidget
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRender {
    /// Where the terminal cursor should be placed, if anywhere
    pub cursor: Option<Position>,
    /// Whether the suggestion list drew any rows
    pub list_drawn: bool,
}

impl BitOrAssign for FieldRender {
    fn bitor_assign(&mut self, rhs: Self) {
        self.cursor = rhs.cursor.or(self.cursor);
        self.list_drawn |= rhs.list_drawn;
    }
}

/// Trait for the field's TUI widgets
pub trait FieldWidget: Sized {
    /// Create a widget from options and theme
    fn from_options(options: &AutoCompleteOptions, theme: Arc<ColorTheme>) -> Self;

    /// Render the widget to the buffer
    fn render(&mut self, area: Rect, buf: &mut Buffer) -> FieldRender;
}
