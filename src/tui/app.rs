use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use color_eyre::eyre::{Result, bail};
use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::crossterm::event::KeyCode::Char;
use ratatui::layout::{Position, Rect};
use ratatui::prelude::Backend;
use ratatui::widgets::Widget;

use super::Event;
use super::Tui;
use super::event::Action;
use super::field::AutoCompleteField;
use super::widget::FieldWidget;
use crate::options::AutoCompleteOptions;
use crate::theme::ColorTheme;

/// A selected suggestion: its text and visible row index
pub type Selection = (String, usize);

/// Host application: routes terminal events to the field
pub struct App {
    /// The autocomplete field
    pub field: AutoCompleteField,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Whether the user aborted
    pub is_abort: bool,
    /// Where to put the terminal cursor after drawing
    pub cursor_pos: Option<Position>,
    /// Color theme
    pub theme: Arc<ColorTheme>,
    /// Configuration options
    pub options: AutoCompleteOptions,
    selection: Rc<RefCell<Option<Selection>>>,
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.field.mount(area);
        let res = self.field.render(area, buf);
        self.cursor_pos = res.cursor;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::from_options(AutoCompleteOptions::default(), Arc::new(ColorTheme::default()), Vec::new())
    }
}

impl App {
    /// Creates a new App from options and the candidates to complete from
    pub fn from_options(options: AutoCompleteOptions, theme: Arc<ColorTheme>, candidates: Vec<String>) -> Self {
        let mut field = AutoCompleteField::from_options(&options, theme.clone());
        let selection = Rc::new(RefCell::new(None));

        let selection_cb = selection.clone();
        let user_cb = options.on_select.clone();
        field.set_on_select(move |text, index| {
            *selection_cb.borrow_mut() = Some((text.to_string(), index));
            if let Some(cb) = &user_cb {
                cb(text, index);
            }
        });

        field.set_candidates(candidates);
        if let Some(query) = options.query.as_deref().filter(|q| !q.is_empty()) {
            field.set_text(query);
            field.flush();
        }

        Self {
            field,
            should_quit: false,
            is_abort: false,
            cursor_pos: None,
            theme,
            options,
            selection,
        }
    }

    /// The last suggestion selected, if any
    pub fn selection(&self) -> Option<Selection> {
        self.selection.borrow().clone()
    }

    /// Handles a single event, sending any follow-up events to the back of the tui's queue
    pub fn handle_event<B: Backend>(&mut self, tui: &mut Tui<B>, event: &Event) -> Result<()>
    where
        B::Error: Send + Sync + 'static,
    {
        match event {
            Event::Render => {
                tui.draw(|f| {
                    f.render_widget(&mut *self, f.area());
                    if let Some(pos) = self.cursor_pos {
                        f.set_cursor_position(pos);
                    }
                })?;
            }
            Event::Heartbeat => (),
            Event::Flush => {
                self.field.flush();
                tui.event_tx.send(Event::Render)?;
            }
            Event::Clear => {
                tui.clear()?;
            }
            Event::Quit => {
                tui.exit()?;
                self.should_quit = true;
            }
            Event::Error(msg) => {
                tui.exit()?;
                bail!(msg.to_owned());
            }
            Event::Action(act) => {
                let events = self.handle_action(act)?;
                for evt in events {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Key(key) => {
                let events = self.handle_key(key);
                for evt in events {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Paste(text) => {
                let text = text.replace(['\n', '\r'], " ");
                self.field.input.insert_str(&text);
                tui.event_tx.send(self.field.on_text_changed())?;
            }
            Event::Mouse(mouse_event) => {
                self.handle_mouse(mouse_event, tui)?;
            }
        };

        Ok(())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Event> {
        debug!("key event: {:?}", key);

        if let Some(act) = &self.options.keymap.get(key) {
            debug!("{act:?}");
            return act.iter().map(|a| Event::Action(a.clone())).collect();
        }
        match key.modifiers {
            KeyModifiers::CONTROL => {
                if let Char('c') = key.code {
                    self.is_abort = true;
                    return vec![Event::Quit];
                }
            }
            KeyModifiers::NONE | KeyModifiers::SHIFT => {
                if let Char(c) = key.code {
                    let c = if key.modifiers == KeyModifiers::SHIFT {
                        c.to_uppercase().next().unwrap_or(c)
                    } else {
                        c
                    };
                    return vec![Event::Action(Action::AddChar(c))];
                }
            }
            _ => (),
        };
        vec![]
    }

    /// Events to send after an edit, when it changed the text
    fn on_edit(&mut self, changed: bool) -> Vec<Event> {
        if changed {
            vec![self.field.on_text_changed()]
        } else {
            vec![]
        }
    }

    fn handle_action(&mut self, act: &Action) -> Result<Vec<Event>> {
        use Action::*;
        trace!("action: {act:?}");
        let input = &mut self.field.input;
        match act {
            Abort => {
                self.is_abort = true;
                self.should_quit = true;
            }
            Accept => {
                if self.field.list.is_visible() && !self.field.has_selected() {
                    return Ok(self.field.select_current().into_iter().collect());
                }
                self.field.end_editing();
                self.should_quit = true;
            }
            AddChar(c) => {
                input.insert(*c);
                return Ok(self.on_edit(true));
            }
            BackwardChar => input.move_backward(),
            BackwardDeleteChar => {
                let changed = input.delete_backward().is_some();
                return Ok(self.on_edit(changed));
            }
            BackwardKillWord => {
                let changed = !input.delete_backward_word().is_empty();
                return Ok(self.on_edit(changed));
            }
            BackwardWord => input.move_backward_word(),
            BeginningOfLine => input.move_to_start(),
            ClearScreen => return Ok(vec![Event::Clear]),
            DeleteChar => {
                let changed = input.delete_forward().is_some();
                return Ok(self.on_edit(changed));
            }
            Down(n) => self.field.list.select_next(usize::from(*n)),
            EndEditing => self.field.end_editing(),
            EndOfLine => input.move_to_end(),
            First => self.field.list.select_first(),
            ForwardChar => input.move_forward(),
            ForwardWord => input.move_forward_word(),
            Ignore => (),
            KillLine => {
                let changed = !input.delete_to_end().is_empty();
                return Ok(self.on_edit(changed));
            }
            Last => self.field.list.select_last(),
            SelectCurrent => return Ok(self.field.select_current().into_iter().collect()),
            SelectRow(index) => return Ok(self.field.select_row(*index).into_iter().collect()),
            SetQuery(text) => return Ok(vec![self.field.set_text(text)]),
            UnixLineDiscard => {
                let changed = !input.delete_to_beginning().is_empty();
                return Ok(self.on_edit(changed));
            }
            UnixWordRubout => {
                let changed = !input.delete_backward_to_whitespace().is_empty();
                return Ok(self.on_edit(changed));
            }
            Up(n) => self.field.list.select_previous(usize::from(*n)),
        }
        Ok(vec![])
    }

    /// Handle mouse events
    fn handle_mouse<B: Backend>(&mut self, mouse_event: &MouseEvent, tui: &mut Tui<B>) -> Result<()>
    where
        B::Error: Send + Sync + 'static,
    {
        if self.options.no_mouse {
            return Ok(());
        }
        let mouse_pos = Position {
            x: mouse_event.column,
            y: mouse_event.row,
        };

        let action = match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => match self.field.row_at(mouse_pos) {
                Some(row) => Action::SelectRow(row),
                None => return Ok(()),
            },
            MouseEventKind::ScrollUp => Action::Up(1),
            MouseEventKind::ScrollDown => Action::Down(1),
            _ => return Ok(()),
        };
        for evt in self.handle_action(&action)? {
            tui.event_tx.send(evt)?;
        }
        Ok(())
    }
}
