//! The autocomplete field: a text input bound to a suggestion list.
//!
//! Edits filter the candidates right away, but the visual consequences (list height, rows,
//! visibility) are queued and only applied by [`AutoCompleteField::flush`]. Methods that queue
//! such an update return [`Event::Flush`]; the host sends it to the back of its event queue so
//! the update lands on the next loop iteration, after the current event is fully handled.

use std::sync::Arc;

use derive_more::Debug;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Color;

use crate::filter::{filter_candidates, visible_rows};
use crate::options::AutoCompleteOptions;
use crate::theme::ColorTheme;
use crate::tui::event::Event;
use crate::tui::input::TextField;
use crate::tui::suggestions::SuggestionList;
use crate::tui::widget::{FieldRender, FieldWidget};
use crate::tui::{Font, Insets, TextAlignment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingUpdate {
    /// Recompute the list height, reload the rows, apply hide-when-empty
    Reload,
    /// Show or hide the list
    SetHidden(bool),
}

/// Text field with an inline suggestion list
#[derive(Debug)]
pub struct AutoCompleteField {
    /// The text input
    pub input: TextField,
    /// The dropdown
    pub list: SuggestionList,
    candidates: Vec<String>,
    filtered: Vec<String>,
    max_count: usize,
    table_height: u16,
    hides_when_selected: bool,
    hides_when_empty: bool,
    editing: bool,
    selected: bool,
    container: Option<Rect>,
    area: Rect,
    pending: Vec<PendingUpdate>,
    #[debug(skip)]
    on_text_change: Option<Box<dyn FnMut(&str)>>,
    #[debug(skip)]
    on_select: Option<Box<dyn FnMut(&str, usize)>>,
}

impl Default for AutoCompleteField {
    fn default() -> Self {
        Self::from_options(&AutoCompleteOptions::default(), Arc::new(ColorTheme::default()))
    }
}

impl AutoCompleteField {
    /// The current text
    pub fn text(&self) -> &str {
        self.input.value()
    }

    /// Every candidate, unfiltered
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Candidates matching the current text
    pub fn filtered(&self) -> &[String] {
        &self.filtered
    }

    /// The first `max_count` filtered candidates
    ///
    /// These follow the text right away; [`AutoCompleteField::select_row`] picks from the rows
    /// rendered by the last flush, which can lag behind until then.
    pub fn visible_rows(&self) -> &[String] {
        visible_rows(&self.filtered, self.max_count)
    }

    /// Whether the suggestion list is hidden
    pub fn is_hidden(&self) -> bool {
        self.list.is_hidden()
    }

    /// Whether the field is being edited
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Whether a suggestion was selected since the text last changed
    pub fn has_selected(&self) -> bool {
        self.selected
    }

    /// Whether an update is waiting for [`AutoCompleteField::flush`]
    pub fn has_pending_update(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Replaces the candidates and re-renders immediately
    ///
    /// The filtered list is reset to every candidate, whatever the current text, and the
    /// highlight goes back to the first row.
    pub fn set_candidates(&mut self, candidates: Vec<String>) {
        debug!("set {} candidates", candidates.len());
        self.filtered = candidates.clone();
        self.candidates = candidates;
        self.list.select_first();
        self.reload();
    }

    /// Handles a change of the input's text
    ///
    /// The host's text change callback runs first, then the candidates are filtered. The list
    /// itself is only updated on the next flush.
    pub fn on_text_changed(&mut self) -> Event {
        self.editing = true;
        self.selected = false;
        let text = self.input.value().to_string();
        if let Some(cb) = self.on_text_change.as_mut() {
            cb(&text);
        }
        self.filtered = filter_candidates(&self.candidates, &text);
        trace!("query {text:?}: {} of {} candidates", self.filtered.len(), self.candidates.len());
        self.queue(PendingUpdate::Reload)
    }

    /// Replaces the text as if it had been typed
    pub fn set_text(&mut self, text: &str) -> Event {
        self.input.set_value(text);
        self.on_text_changed()
    }

    /// Stops editing: the list is hidden right away and stays hidden until the text changes
    pub fn end_editing(&mut self) {
        debug!("end editing");
        self.editing = false;
        self.list.set_hidden(true);
    }

    /// Focuses the field again without changing the text
    pub fn begin_editing(&mut self) {
        self.editing = true;
    }

    /// Selects a rendered row
    ///
    /// `index` refers to the rows drawn as of the last flush, not to [`AutoCompleteField::visible_rows`].
    /// The text becomes the row's text, without counting as a text change, and the host's
    /// selection callback fires. Returns `None` and does nothing when `index` is not a
    /// rendered row.
    pub fn select_row(&mut self, index: usize) -> Option<Event> {
        let Some(text) = self.list.rows().get(index).cloned() else {
            debug!("select_row: no row {index}");
            return None;
        };
        debug!("selected row {index}: {text:?}");
        self.input.set_value(&text);
        self.selected = true;
        if let Some(cb) = self.on_select.as_mut() {
            cb(&text, index);
        }
        Some(self.queue(PendingUpdate::SetHidden(self.hides_when_selected)))
    }

    /// Selects the highlighted row, if the list is showing one
    pub fn select_current(&mut self) -> Option<Event> {
        if !self.list.is_visible() {
            return None;
        }
        self.select_row(self.list.current())
    }

    /// Highlights the next suggestion
    pub fn select_next(&mut self) {
        self.list.select_next(1);
    }

    /// Highlights the previous suggestion
    pub fn select_previous(&mut self) {
        self.list.select_previous(1);
    }

    /// Applies the queued updates, in order
    pub fn flush(&mut self) {
        for update in std::mem::take(&mut self.pending) {
            trace!("flush {update:?}");
            match update {
                PendingUpdate::Reload => {
                    self.reload();
                    if self.editing {
                        let hidden = self.hides_when_empty && self.filtered.is_empty();
                        self.list.set_hidden(hidden);
                    }
                }
                PendingUpdate::SetHidden(hidden) => {
                    if self.editing || hidden {
                        self.list.set_hidden(hidden);
                    }
                }
            }
        }
    }

    fn queue(&mut self, update: PendingUpdate) -> Event {
        self.pending.push(update);
        Event::Flush
    }

    /// Recomputes the list height and reloads its rows
    fn reload(&mut self) {
        let rows = visible_rows(&self.filtered, self.max_count);
        let count = u16::try_from(rows.len()).unwrap_or(u16::MAX);
        let height = self
            .table_height
            .min(count.saturating_mul(self.list.row_height.max(1)));
        self.list.set_height(height);
        let query = self.input.value().to_string();
        self.list.set_rows(rows, &query);
    }

    //  --- Configuration ---

    /// Sets the callback run on every text change
    pub fn set_on_text_change(&mut self, cb: impl FnMut(&str) + 'static) {
        self.on_text_change = Some(Box::new(cb));
    }

    /// Sets the callback run when a suggestion is selected
    pub fn set_on_select(&mut self, cb: impl FnMut(&str, usize) + 'static) {
        self.on_select = Some(Box::new(cb));
    }

    /// Maximum number of rendered suggestions
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Sets the maximum number of rendered suggestions and re-renders immediately
    pub fn set_max_count(&mut self, max_count: usize) {
        self.max_count = max_count;
        self.reload();
    }

    /// Cap on the list height, in lines
    pub fn table_height(&self) -> u16 {
        self.table_height
    }

    /// Sets the cap on the list height and re-renders immediately
    pub fn set_table_height(&mut self, table_height: u16) {
        self.table_height = table_height;
        self.reload();
    }

    /// Sets the lines per row and re-renders immediately
    pub fn set_row_height(&mut self, row_height: u16) {
        self.list.row_height = row_height.max(1);
        self.reload();
    }

    /// Sets the label insets
    pub fn set_label_insets(&mut self, insets: Insets) {
        self.list.label_insets = insets;
    }

    /// Sets the separator insets
    pub fn set_separator_insets(&mut self, insets: Insets) {
        self.list.separator_insets = insets;
    }

    /// Sets the label alignment
    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.list.alignment = alignment;
    }

    /// Sets the label modifiers
    pub fn set_font(&mut self, font: Font) {
        self.list.font = font.0;
    }

    /// Sets the label color
    pub fn set_text_color(&mut self, color: Option<Color>) {
        self.list.text_color = color;
    }

    /// Whether selecting hides the list
    pub fn hides_when_selected(&self) -> bool {
        self.hides_when_selected
    }

    /// Sets whether selecting hides the list
    pub fn set_hides_when_selected(&mut self, hides: bool) {
        self.hides_when_selected = hides;
    }

    /// Whether the list hides when nothing matches
    pub fn hides_when_empty(&self) -> bool {
        self.hides_when_empty
    }

    /// Also hides (or shows) the list right away
    pub fn set_hides_when_empty(&mut self, hides: bool) {
        self.hides_when_empty = hides;
        self.list.set_hidden(hides);
    }

    //  --- Layout ---

    /// Attaches the list to a host container area
    ///
    /// Returns whether anything changed: mounting on the current container is a no-op.
    pub fn mount(&mut self, container: Rect) -> bool {
        if self.container == Some(container) {
            return false;
        }
        if let Some(old) = self.container {
            debug!("moving suggestions from {old:?} to {container:?}");
        } else {
            debug!("mounting suggestions on {container:?}");
        }
        self.container = Some(container);
        true
    }

    /// Detaches the list from its container
    pub fn unmount(&mut self) {
        self.container = None;
    }

    /// The container the list is mounted on
    pub fn container(&self) -> Option<Rect> {
        self.container
    }

    /// Area of the text input as last rendered
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Where the list goes, when mounted
    pub fn list_frame(&self) -> Option<Rect> {
        self.container
            .map(|container| SuggestionList::frame(self.area, container, self.list.height()))
    }

    /// Rendered row under a screen position
    pub fn row_at(&self, position: Position) -> Option<usize> {
        self.list_frame().and_then(|frame| self.list.row_at(frame, position))
    }
}

impl FieldWidget for AutoCompleteField {
    fn from_options(options: &AutoCompleteOptions, theme: Arc<ColorTheme>) -> Self {
        let mut res = Self {
            input: TextField::from_options(options, theme.clone()),
            list: SuggestionList::from_options(options, theme),
            candidates: Vec::new(),
            filtered: Vec::new(),
            max_count: options.max_count,
            table_height: options.table_height,
            hides_when_selected: options.hides_when_selected,
            hides_when_empty: options.hides_when_empty,
            editing: true,
            selected: false,
            container: None,
            area: Rect::default(),
            pending: Vec::new(),
            on_text_change: None,
            on_select: None,
        };
        if let Some(cb) = options.on_text_change.clone() {
            res.set_on_text_change(move |text| cb(text));
        }
        if let Some(cb) = options.on_select.clone() {
            res.set_on_select(move |text, index| cb(text, index));
        }
        res
    }

    /// Draws the input at the top of `area`, then the list below it when mounted
    fn render(&mut self, area: Rect, buf: &mut Buffer) -> FieldRender {
        self.area = Rect {
            height: self.input.height().min(area.height),
            ..area
        };
        let mut res = self.input.render(self.area, buf);
        if let Some(frame) = self.list_frame() {
            res |= self.list.render(frame, buf);
        }
        res
    }
}
