//! A terminal text field with an inline autocomplete suggestion list.
//!
//! As the user types, the candidates containing the text (ignoring case) are listed below the
//! field, capped to a few rows. Selecting one replaces the text with it.
//!
//! # Examples
//!
//! ```no_run
//! use autocomplete::prelude::*;
//!
//! let options = AutoCompleteOptionsBuilder::default()
//!     .max_count(5)
//!     .build()
//!     .unwrap();
//!
//! let candidates = ["awk", "bash", "csh", "dash", "fish", "ksh", "zsh"]
//!     .into_iter()
//!     .map(String::from)
//!     .collect();
//!
//! let output = AutoComplete::run_with(options, candidates).unwrap();
//! println!("{}", output.text);
//! ```
//!
//! The field can also be driven without a terminal, see [`tui::AutoCompleteField`].

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub use crate::autocomplete::AutoComplete;
pub use crate::options::AutoCompleteOptions;
pub use crate::output::AutoCompleteOutput;

mod autocomplete;
pub mod binds;
pub mod filter;
pub mod options;
mod output;
pub mod prelude;
pub mod theme;
pub mod tui;
pub mod util;
