//! Terminal UI components and rendering.
//!
//! This module provides the autocomplete field itself, its text input and suggestion list
//! widgets, and the terminal host (event loop, key handling) used to run it.

use std::num::ParseIntError;

pub use app::App;
pub use event::Event;
pub use field::AutoCompleteField;
use thiserror::Error;
pub use widget::{FieldRender, FieldWidget};
mod app;
mod backend;
pub use backend::Tui;
/// Event handling and action definitions
pub mod event;
/// The autocomplete field: text input bound to a suggestion list
pub mod field;
mod input;
pub use input::TextField;
/// The dropdown list of suggestions
pub mod suggestions;
mod util;
/// Widget rendering utilities
pub mod widget;

/// Represents a size value, either as a percentage or fixed value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    /// Size as a percentage (0-100)
    Percent(u16),
    /// Fixed size in terminal cells
    Fixed(u16),
}

/// Error type for parsing size and inset values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SizeParseError {
    /// Error parsing one of the numbers
    #[error("Error parsing {0}: {1:?}")]
    ParseError(String, ParseIntError),
    /// Percentage value exceeds 100
    #[error("Invalid percentage {0}")]
    InvalidPercent(u16),
    /// Insets need 1, 2 or 4 comma separated values
    #[error("Expected 1, 2 or 4 values in {0}")]
    InvalidInsets(String),
}

impl TryFrom<&str> for Size {
    type Error = SizeParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if let Some(percent) = value.strip_suffix('%') {
            let percent = percent
                .parse::<u16>()
                .map_err(|e| SizeParseError::ParseError(value.to_string(), e))?;
            if percent > 100 {
                return Err(SizeParseError::InvalidPercent(percent));
            }
            Ok(Self::Percent(percent))
        } else {
            Ok(Self::Fixed(
                value
                    .parse::<u16>()
                    .map_err(|e| SizeParseError::ParseError(value.to_string(), e))?,
            ))
        }
    }
}

impl std::str::FromStr for Size {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::Percent(100)
    }
}

impl Size {
    /// Resolves the size against a total, in cells
    pub fn resolve(self, total: u16) -> u16 {
        match self {
            Size::Fixed(n) => n.min(total),
            Size::Percent(p) => (total as u32 * p as u32 / 100) as u16,
        }
    }
}

/// Spacing around a piece of content, in terminal cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Insets {
    /// Lines above
    pub top: u16,
    /// Columns on the left
    pub left: u16,
    /// Lines below
    pub bottom: u16,
    /// Columns on the right
    pub right: u16,
}

impl Insets {
    /// Creates insets from explicit values
    pub const fn new(top: u16, left: u16, bottom: u16, right: u16) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Horizontal-only insets
    pub const fn horizontal(left: u16, right: u16) -> Self {
        Self::new(0, left, 0, right)
    }

    /// Shrinks `area` by the insets, saturating at an empty rect
    pub fn apply(&self, area: ratatui::layout::Rect) -> ratatui::layout::Rect {
        let x = area.x.saturating_add(self.left.min(area.width));
        let y = area.y.saturating_add(self.top.min(area.height));
        ratatui::layout::Rect {
            x,
            y,
            width: area.width.saturating_sub(self.left.saturating_add(self.right)),
            height: area.height.saturating_sub(self.top.saturating_add(self.bottom)),
        }
    }
}

/// Parses `ALL`, `VERTICAL,HORIZONTAL` or `TOP,RIGHT,BOTTOM,LEFT`
impl TryFrom<&str> for Insets {
    type Error = SizeParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parts = value
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<u16>()
                    .map_err(|e| SizeParseError::ParseError(value.to_string(), e))
            })
            .collect::<Result<Vec<u16>, _>>()?;
        match parts[..] {
            [all] => Ok(Self::new(all, all, all, all)),
            [v, h] => Ok(Self::new(v, h, v, h)),
            [top, right, bottom, left] => Ok(Self::new(top, left, bottom, right)),
            _ => Err(SizeParseError::InvalidInsets(value.to_string())),
        }
    }
}

impl std::str::FromStr for Insets {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Text modifiers applied to the suggestion labels, parsed from e.g. `bold,italic`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Font(pub ratatui::style::Modifier);

/// Error type for parsing a font
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown font modifier {0}")]
pub struct FontParseError(String);

impl TryFrom<&str> for Font {
    type Error = FontParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value
            .split([',', '+'])
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .try_fold(ratatui::style::Modifier::empty(), |acc, m| {
                crate::theme::parse_modifier(m)
                    .map(|modifier| acc | modifier)
                    .ok_or_else(|| FontParseError(m.to_string()))
            })
            .map(Font)
    }
}

impl std::str::FromStr for Font {
    type Err = FontParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Horizontal alignment of the suggestion text inside its row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TextAlignment {
    /// Left aligned
    #[default]
    Left,
    /// Centered
    Center,
    /// Right aligned
    Right,
}

impl From<TextAlignment> for ratatui::layout::Alignment {
    fn from(value: TextAlignment) -> Self {
        match value {
            TextAlignment::Left => Self::Left,
            TextAlignment::Center => Self::Center,
            TextAlignment::Right => Self::Right,
        }
    }
}
