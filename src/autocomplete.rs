//! Module containing the field's terminal entry point
use std::io::Stderr;
use std::sync::Arc;

use color_eyre::eyre::Result;
use color_eyre::eyre::{self, OptionExt};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use tokio::{runtime::Handle, task::block_in_place};

use crate::tui::{App, Event, Size, Tui};
use crate::{AutoCompleteOptions, AutoCompleteOutput};

/// Runs an [`App`] in a terminal
pub struct AutoComplete<Backend = CrosstermBackend<Stderr>>
where
    Backend: ratatui::backend::Backend,
    Backend::Error: Send + Sync + 'static,
{
    app: App,
    tui: Option<Tui<Backend>>,
    height: Size,
    final_key: KeyEvent,
}

impl AutoComplete {
    /// Run the field over `candidates` until the user accepts or aborts
    ///
    /// Uses the current tokio runtime when there is one, and a new one otherwise.
    pub fn run_with(options: AutoCompleteOptions, candidates: Vec<String>) -> Result<AutoCompleteOutput> {
        trace!("running autocomplete over {} candidates", candidates.len());
        let mut ac = Self::init(options, candidates)?;
        ac.init_tui()?;
        let task = async {
            ac.enter()?;
            ac.run().await?;
            ac.exit()?;
            eyre::Ok(())
        };

        if let Ok(handle) = Handle::try_current() {
            block_in_place(|| handle.block_on(task))?;
        } else {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(task)?;
        }
        let output = ac.output();
        debug!("output: {output:?}");

        Ok(output)
    }

    /// Initialize the TUI on stderr, but do not enter it yet
    pub fn init_tui(&mut self) -> Result<()> {
        let mut tui = Tui::new_with_height(CrosstermBackend::new(std::io::stderr()), self.height)?;
        tui.mouse = !self.app.options.no_mouse;
        self.tui = Some(tui);
        Ok(())
    }
}

impl<Backend: ratatui::backend::Backend + 'static> AutoComplete<Backend>
where
    Backend::Error: Send + Sync + 'static,
{
    /// Initialize the field, without starting anything yet
    pub fn init(options: AutoCompleteOptions, candidates: Vec<String>) -> Result<Self> {
        let theme = Arc::new(crate::theme::ColorTheme::init_from_options(&options));
        let height = options.height.unwrap_or_else(|| {
            // The input, then room for the list below it
            let input = if options.border { 3 } else { 1 };
            Size::Fixed(options.table_height.saturating_add(input))
        });
        let app = App::from_options(options, theme, candidates);
        Ok(Self {
            app,
            tui: None,
            height,
            final_key: KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
        })
    }

    /// Initialize the TUI with a caller-provided instance.
    ///
    /// Use this instead of [`init_tui()`](AutoComplete::init_tui) when you need a
    /// non-default backend (e.g. `TestBackend` for snapshot tests).
    pub fn init_tui_with(&mut self, tui: Tui<Backend>) {
        self.tui = Some(tui);
    }

    /// Returns a shared reference to the application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Returns a mutable reference to the application state.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Returns a mutable reference to the TUI.
    ///
    /// # Panics
    ///
    /// Panics if the TUI has not been initialized yet.
    pub fn tui_mut(&mut self) -> &mut Tui<Backend> {
        self.tui.as_mut().expect("TUI needs to be initialized before access")
    }

    /// Returns mutable references to both the app and the TUI simultaneously.
    ///
    /// # Panics
    ///
    /// Panics if the TUI has not been initialized yet.
    pub fn app_and_tui(&mut self) -> (&mut App, &mut Tui<Backend>) {
        (
            &mut self.app,
            self.tui.as_mut().expect("TUI needs to be initialized before access"),
        )
    }

    /// Enter the TUI and queue the first frame
    pub fn enter(&mut self) -> Result<()> {
        debug!("Entering TUI");
        let tui = self.tui.as_mut().ok_or_eyre("TUI needs to be initialized before entering")?;
        tui.enter()?;
        tui.event_tx.send(Event::Render)?;
        Ok(())
    }

    /// Leave the TUI, restoring the terminal
    pub fn exit(&mut self) -> Result<()> {
        if let Some(tui) = self.tui.as_mut() {
            tui.exit()?;
        }
        Ok(())
    }

    /// Process a single event.
    ///
    /// Returns `Ok(true)` once the field should close.
    pub async fn tick(&mut self) -> Result<bool> {
        let tui = self.tui.as_mut().ok_or_eyre("TUI should be initialized before the event loop can start")?;
        let evt = tui.next().await.ok_or_eyre("Could not acquire next event")?;
        self.handle(evt)
    }

    /// Handles one event, remembering the keys that were pressed
    pub fn handle(&mut self, evt: Event) -> Result<bool> {
        if let Event::Key(k) = &evt {
            self.final_key = k.to_owned();
        }
        let tui = self.tui.as_mut().ok_or_eyre("TUI should be initialized before handling events")?;
        self.app.handle_event(tui, &evt)?;
        Ok(self.app.should_quit)
    }

    /// Run the event loop until the field closes
    pub async fn run(&mut self) -> Result<()> {
        trace!("Starting event loop");
        loop {
            if self.tick().await? {
                break Ok(());
            }
        }
    }

    /// Returns true once the user accepted or aborted
    pub fn should_quit(&self) -> bool {
        self.app.should_quit
    }

    /// Collects the result
    pub fn output(&self) -> AutoCompleteOutput {
        AutoCompleteOutput {
            text: self.app.field.text().to_string(),
            selection: self.app.selection(),
            is_abort: self.app.is_abort,
            final_key: self.final_key,
        }
    }
}
