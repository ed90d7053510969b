use crossterm::event::KeyEvent;

/// What the field ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCompleteOutput {
    /// The text in the field when it closed
    pub text: String,
    /// The last suggestion selected, as (text, visible row index)
    pub selection: Option<(String, usize)>,
    /// Whether the user aborted
    pub is_abort: bool,
    /// The last key pressed
    pub final_key: KeyEvent,
}
