//! Convenience re-exports of commonly used types.
//!
//! `use autocomplete::prelude::*;` brings in the entry point, the options and the field.

pub use crate::filter::{SubstringFilter, filter_candidates, visible_rows};
pub use crate::options::{AutoCompleteOptions, AutoCompleteOptionsBuilder, SelectCallback, TextChangeCallback};
pub use crate::tui::{AutoCompleteField, Event, FieldWidget, Font, Insets, TextAlignment, event::Action};
pub use crate::*;
pub use std::rc::Rc;
pub use std::sync::Arc;
