//! Configuration options for the autocomplete field.
//!
//! This module provides the `AutoCompleteOptions` struct and builder for configuring the field,
//! its suggestion list and the terminal host running it.

use std::rc::Rc;

use derive_builder::Builder;
use derive_more::Debug;
use ratatui::style::Color;

use crate::binds::KeyMap;
use crate::tui::{Font, Insets, Size, TextAlignment};

/// Called with the new text after every edit
pub type TextChangeCallback = Rc<dyn Fn(&str)>;
/// Called with the text and visible row index of a selected suggestion
pub type SelectCallback = Rc<dyn Fn(&str, usize)>;

/// ac - terminal text field with inline autocompletion
///
/// Reads candidates from stdin or --source and shows the ones containing the typed text below
/// the field.
#[derive(Builder, Debug)]
#[builder(build_fn(name = "final_build"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "ac", args_override_self = true, verbatim_doc_comment, version, about)
)]
pub struct AutoCompleteOptions {
    //  --- Suggestions ---
    /// Maximum number of suggestions shown at once
    #[cfg_attr(feature = "cli", arg(long, short = 'n', default_value = "3", help_heading = "Suggestions"))]
    pub max_count: usize,

    /// Height of each suggestion row, in lines
    ///
    /// Rows taller than one line get a separator on their last line.
    #[cfg_attr(feature = "cli", arg(long, default_value = "1", help_heading = "Suggestions"))]
    pub row_height: u16,

    /// Upper bound on the suggestion list height, in lines
    #[cfg_attr(feature = "cli", arg(long, default_value = "10", help_heading = "Suggestions"))]
    pub table_height: u16,

    /// Keep the suggestions open after one is selected
    #[cfg_attr(
        feature = "cli",
        arg(long = "keep-on-select", action = clap::ArgAction::SetFalse, help_heading = "Suggestions")
    )]
    pub hides_when_selected: bool,

    /// Keep the (empty) suggestion list open when nothing matches
    #[cfg_attr(
        feature = "cli",
        arg(long = "show-when-empty", action = clap::ArgAction::SetFalse, help_heading = "Suggestions")
    )]
    pub hides_when_empty: bool,

    /// Candidates to complete from, one per line
    ///
    /// Defaults to reading stdin when it is not a terminal
    #[cfg_attr(feature = "cli", arg(long, short, help_heading = "Suggestions"))]
    pub source: Option<String>,

    //  --- Display ---
    /// Alignment of the suggestion text
    #[cfg_attr(
        feature = "cli",
        arg(long, value_enum, default_value = "left", help_heading = "Display")
    )]
    pub alignment: TextAlignment,

    /// Insets of the suggestion text inside its row
    ///
    /// Format: ALL, VERTICAL,HORIZONTAL or TOP,RIGHT,BOTTOM,LEFT
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = "0,1", help_heading = "Display", verbatim_doc_comment)
    )]
    pub label_insets: Insets,

    /// Horizontal insets of the separator line between rows
    ///
    /// Same format as --label-insets, only left and right are used
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = "0", help_heading = "Display", verbatim_doc_comment)
    )]
    pub separator_insets: Insets,

    /// Text modifiers of the suggestions, e.g. `bold,italic`
    #[cfg_attr(feature = "cli", arg(long, default_value = "", help_heading = "Display"))]
    pub font: Font,

    /// Foreground color of the suggestions: a name, an index or #rrggbb
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Display"))]
    pub text_color: Option<Color>,

    /// Change the color theme
    ///
    /// Format: [BASE][,COLOR:ANSI]
    ///
    /// BASE is one of dark, light, 16, bw, none. COLOR is one of normal, suggestion, matched,
    /// current, current_match, separator, query, prompt, border, with an optional _fg or _bg
    /// suffix.
    ///
    /// Example: --color light,matched:#ff0000,current_bg:236
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Display", verbatim_doc_comment))]
    pub color: Option<String>,

    /// Input prompt
    #[cfg_attr(feature = "cli", arg(long, short, default_value = "> ", help_heading = "Display"))]
    pub prompt: String,

    /// Draw a border around the text field
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Display"))]
    pub border: bool,

    /// Height of the inline viewport, fixed lines or a percentage of the terminal
    ///
    /// Defaults to the field plus the suggestion list cap
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Display"))]
    pub height: Option<Size>,

    //  --- Interface ---
    /// Initial text
    #[cfg_attr(feature = "cli", arg(long, short, help_heading = "Interface"))]
    pub query: Option<String>,

    /// Comma separated list of bindings
    ///
    /// Format: KEY:ACTION[+ACTION]
    ///
    /// Example: --bind 'ctrl-y:select-current,enter:select-current+end-editing'
    ///
    /// Actions: abort, accept, select-current, select-row(N), end-editing, up, down, first,
    /// last, set-query(TEXT), and the usual line editing actions.
    #[cfg_attr(
        feature = "cli",
        arg(long, short, help_heading = "Interface", verbatim_doc_comment)
    )]
    pub bind: Vec<String>,

    /// Disable mouse selection of the suggestions
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface"))]
    pub no_mouse: bool,

    //  --- Scripting ---
    /// Print the suggestions for a query and exit
    #[cfg_attr(feature = "cli", arg(long, short, help_heading = "Scripting"))]
    pub filter: Option<String>,

    /// Also print the index of the selected suggestion
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scripting"))]
    pub print_index: bool,

    /// Pipe log output to a file
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scripting"))]
    pub log_file: Option<String>,

    /// Called after every edit of the text
    #[cfg_attr(feature = "cli", clap(skip))]
    #[debug(skip)]
    pub on_text_change: Option<TextChangeCallback>,

    /// Called when a suggestion is selected
    #[cfg_attr(feature = "cli", clap(skip))]
    #[debug(skip)]
    pub on_select: Option<SelectCallback>,

    /// The internal (parsed) keymap
    #[cfg_attr(feature = "cli", clap(skip))]
    pub keymap: KeyMap,
}

impl Default for AutoCompleteOptions {
    fn default() -> Self {
        Self {
            max_count: 3,
            row_height: 1,
            table_height: 10,
            hides_when_selected: true,
            hides_when_empty: true,
            source: Default::default(),
            alignment: Default::default(),
            label_insets: Insets::horizontal(1, 1),
            separator_insets: Default::default(),
            font: Default::default(),
            text_color: Default::default(),
            color: Default::default(),
            prompt: String::from("> "),
            border: Default::default(),
            height: Default::default(),
            query: Default::default(),
            bind: Default::default(),
            no_mouse: Default::default(),
            filter: Default::default(),
            print_index: Default::default(),
            log_file: Default::default(),
            on_text_change: Default::default(),
            on_select: Default::default(),
            keymap: Default::default(),
        }
    }
}

impl AutoCompleteOptionsBuilder {
    /// Builds the AutoCompleteOptions from the builder
    pub fn build(&mut self) -> Result<AutoCompleteOptions, AutoCompleteOptionsBuilderError> {
        self.final_build().map(|opts| opts.build())
    }
}

impl AutoCompleteOptions {
    /// Finalizes the options: folds `bind` into the keymap and clamps the row settings
    pub fn build(mut self) -> Self {
        self.keymap = self.bind.iter().fold(KeyMap::default(), |mut res, part| {
            res.add_keymaps(part.split(','));
            res
        });
        if self.row_height == 0 {
            debug!("row height of 0 requested, using 1");
            self.row_height = 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::event::Action;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn defaults() {
        let opts = AutoCompleteOptions::default();
        assert_eq!(opts.max_count, 3);
        assert!(opts.hides_when_selected);
        assert!(opts.hides_when_empty);
        assert_eq!(opts.label_insets, Insets::new(0, 1, 0, 1));
    }

    #[test]
    fn builder_folds_bindings() {
        let opts = AutoCompleteOptionsBuilder::default()
            .max_count(5)
            .bind(vec![String::from("ctrl-y:select-current")])
            .row_height(0)
            .build()
            .unwrap();
        assert_eq!(opts.max_count, 5);
        assert_eq!(opts.row_height, 1);
        assert_eq!(
            opts.keymap.get(&KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL)),
            Some(&vec![Action::SelectCurrent])
        );
        // Defaults are kept
        assert_eq!(
            opts.keymap.get(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            Some(&vec![Action::Accept])
        );
    }

    #[cfg(feature = "cli")]
    #[test]
    fn cli_flags() {
        use clap::Parser;
        let opts = AutoCompleteOptions::try_parse_from([
            "ac",
            "--keep-on-select",
            "--label-insets",
            "1,2",
            "--font",
            "bold",
            "--text-color",
            "red",
            "-n",
            "1",
        ])
        .unwrap()
        .build();
        assert!(!opts.hides_when_selected);
        assert!(opts.hides_when_empty);
        assert_eq!(opts.label_insets, Insets::new(1, 2, 1, 2));
        assert_eq!(opts.font, Font(ratatui::style::Modifier::BOLD));
        assert_eq!(opts.text_color, Some(Color::Red));
        assert_eq!(opts.max_count, 1);
        assert_eq!(opts.prompt, "> ");
    }
}
