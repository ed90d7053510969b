use autocomplete::{
    AutoComplete,
    prelude::*,
    tui::{Size, Tui},
};
use clap::Parser;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::layout::Position;

/// A test harness driving the field over a [`TestBackend`].
///
/// Events go through the tui's event channel and are handled exactly like the real event loop
/// does, minus the terminal input task. Initialization goes through [`AutoComplete::init`] and
/// [`AutoComplete::init_tui_with`] to share the production code path.
pub struct TestHarness {
    /// The field, backed by a TestBackend
    pub ac: AutoComplete<TestBackend>,
    /// The event that made the field close
    pub final_event: Option<Event>,
}

impl TestHarness {
    /// Process all pending events, including the ones queued while processing.
    pub fn tick(&mut self) -> Result<()> {
        loop {
            let mut events = Vec::new();
            while let Ok(event) = self.ac.tui_mut().event_rx.try_recv() {
                events.push(event);
            }
            if events.is_empty() {
                break;
            }
            for event in events {
                let quit = self.ac.handle(event.clone())?;
                if quit && self.final_event.is_none() {
                    self.final_event = Some(event);
                }
            }
        }
        Ok(())
    }

    /// Queue an event. Call `tick()` to process it.
    pub fn send(&mut self, event: Event) -> Result<()> {
        self.ac.tui_mut().event_tx.send(event)?;
        Ok(())
    }

    /// Send a key event and process everything it triggers.
    pub fn key(&mut self, key: KeyEvent) -> Result<()> {
        self.send(Event::Key(key))?;
        self.tick()
    }

    /// Send a character key event.
    pub fn char(&mut self, c: char) -> Result<()> {
        self.key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    /// Type a string, one key event per character.
    pub fn type_str(&mut self, s: &str) -> Result<()> {
        for c in s.chars() {
            self.char(c)?;
        }
        Ok(())
    }

    /// Send an action and process everything it triggers.
    pub fn action(&mut self, action: Action) -> Result<()> {
        self.send(Event::Action(action))?;
        self.tick()
    }

    /// Left click at a screen position.
    pub fn click(&mut self, column: u16, row: u16) -> Result<()> {
        self.send(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))?;
        self.tick()
    }

    /// Draw the current state.
    pub fn render(&mut self) -> Result<()> {
        self.send(Event::Render)?;
        self.tick()
    }

    /// The drawn buffer, one string per line with trailing spaces removed.
    pub fn lines(&mut self) -> Vec<String> {
        let buf = self.ac.tui_mut().backend().buffer().clone();
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

    /// The non-empty drawn lines, for snapshots.
    pub fn buffer_view(&mut self) -> String {
        let mut lines = self.lines();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    /// Where the terminal cursor was put on the last draw.
    pub fn cursor(&self) -> Option<Position> {
        self.ac.app().cursor_pos
    }

    /// Exit code `ac` would return: 130 after an abort, 0 otherwise, `None` while running.
    pub fn app_exit_code(&self) -> Option<i32> {
        if !self.ac.should_quit() {
            return None;
        }
        Some(if self.ac.app().is_abort { 130 } else { 0 })
    }
}

/// Initialize a harness with the given options, candidates and dimensions.
pub fn enter_sized<I, S>(candidates: I, options: AutoCompleteOptions, width: u16, height: u16) -> Result<TestHarness>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let candidates = candidates.into_iter().map(|s| s.as_ref().to_string()).collect();
    let tui = Tui::new_with_height(TestBackend::new(width, height), Size::Percent(100))?;
    let mut ac = AutoComplete::<TestBackend>::init(options, candidates)?;
    ac.init_tui_with(tui);
    let mut harness = TestHarness { ac, final_event: None };
    harness.render()?;
    Ok(harness)
}

/// Initialize a harness with default dimensions (40x12).
pub fn enter<I, S>(candidates: I, options: AutoCompleteOptions) -> Result<TestHarness>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    enter_sized(candidates, options, 40, 12)
}

/// Parse options from CLI-style arguments.
pub fn parse_options(args: &[&str]) -> AutoCompleteOptions {
    let mut full_args = vec!["ac"];
    full_args.extend(args);
    AutoCompleteOptions::try_parse_from(full_args)
        .expect("Failed to parse options")
        .build()
}

/// Macro for writing compact field tests.
///
/// ```ignore
/// field_test!(name, ["Apple", "Banana"], &["--opts"], {
///     @type "ap";
///     @lines ["> ap", " Apple"];
///     @key Enter;
///     @text "Apple";
/// });
/// ```
#[macro_export]
macro_rules! field_test {
    ($name:ident, [$($item:expr),* $(,)?], $options:expr, { $($content:tt)* }) => {
        #[test]
        fn $name() -> color_eyre::Result<()> {
            let options = $crate::common::harness::parse_options($options);
            let items: Vec<&str> = vec![$($item),*];
            let mut h = $crate::common::harness::enter(items, options)?;

            field_test!(@expand h; $($content)*);

            Ok(())
        }
    };

    (@expand $h:ident; ) => {};

    // @lines - compare the drawn lines, trailing empty lines excluded
    (@expand $h:ident; @lines [$($line:expr),* $(,)?] ; $($rest:tt)*) => {
        $h.render()?;
        let expected: Vec<&str> = vec![$($line),*];
        assert_eq!($h.buffer_view(), expected.join("\n"));
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @char $c:expr ; $($rest:tt)*) => {
        $h.char($c)?;
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @type $text:expr ; $($rest:tt)*) => {
        $h.type_str($text)?;
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @action $action:ident ; $($rest:tt)*) => {
        $h.action(autocomplete::tui::event::Action::$action)?;
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @action $action:ident ($($args:tt)*) ; $($rest:tt)*) => {
        $h.action(autocomplete::tui::event::Action::$action($($args)*))?;
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @key $key:ident ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::$key,
            crossterm::event::KeyModifiers::NONE
        ))?;
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @ctrl $key:literal ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char($key),
            crossterm::event::KeyModifiers::CONTROL
        ))?;
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @alt $key:ident ; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::$key,
            crossterm::event::KeyModifiers::ALT
        ))?;
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @click ($x:expr, $y:expr) ; $($rest:tt)*) => {
        $h.click($x, $y)?;
        field_test!(@expand $h; $($rest)*);
    };

    // Usage: @assert(|h: &common::harness::TestHarness| h.ac.should_quit());
    (@expand $h:ident; @assert ( $assertion:expr ) ; $($rest:tt)*) => {
        assert!(($assertion)(&$h));
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @text $text:expr ; $($rest:tt)*) => {
        assert_eq!($h.ac.app().field.text(), $text);
        field_test!(@expand $h; $($rest)*);
    };

    (@expand $h:ident; @exited $code:expr ; $($rest:tt)*) => {
        assert_eq!(
            $h.app_exit_code(),
            Some($code),
            "Expected the field to exit with status code {}, but got {:?}",
            $code,
            $h.app_exit_code()
        );
        field_test!(@expand $h; $($rest)*);
    };
}
