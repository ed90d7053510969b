use crossterm::event::{KeyEvent, MouseEvent};

/// Events flowing through the host's event loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Quit the application
    Quit,
    /// An error occurred
    Error(String),
    /// Timer tick event
    Heartbeat,
    /// Render the UI
    Render,
    /// A key was pressed
    Key(KeyEvent),
    /// Text was pasted (bracketed paste)
    Paste(String),
    /// A mouse event occurred
    Mouse(MouseEvent),
    /// An action was triggered
    Action(Action),
    /// Apply the field's pending visual update
    ///
    /// Queued behind the event that produced it, so layout and visibility changes never land
    /// while that event is still being handled.
    Flush,
    /// Clear the screen
    Clear,
}

/// Actions that can be performed on the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Exit without accepting
    Abort,
    /// Select the highlighted suggestion, or accept the current text when the list is hidden
    Accept,
    /// Add a character at the cursor
    AddChar(char),
    /// Move cursor backward one character
    BackwardChar,
    /// Delete character before cursor
    BackwardDeleteChar,
    /// Delete word before cursor
    BackwardKillWord,
    /// Move cursor backward one word
    BackwardWord,
    /// Move cursor to beginning of line
    BeginningOfLine,
    /// Clear the screen
    ClearScreen,
    /// Delete character under cursor
    DeleteChar,
    /// Highlight the next suggestion
    Down(u16),
    /// Stop editing: hides the suggestions
    EndEditing,
    /// Move cursor to end of line
    EndOfLine,
    /// Jump to the first suggestion
    First,
    /// Move cursor forward one character
    ForwardChar,
    /// Move cursor forward one word
    ForwardWord,
    /// Ignore the action
    Ignore,
    /// Delete from cursor to end of line
    KillLine,
    /// Jump to the last suggestion
    Last,
    /// Select the highlighted suggestion
    SelectCurrent,
    /// Select a specific visible row
    SelectRow(usize),
    /// Replace the text, as if typed
    SetQuery(String),
    /// Discard line (unix-style)
    UnixLineDiscard,
    /// Delete word backward (unix-style)
    UnixWordRubout,
    /// Highlight the previous suggestion
    Up(u16),
}

/// Parses an action string into an Action enum
pub fn parse_action(raw_action: &str) -> Option<Action> {
    let parts = raw_action.split_once([':', '(', ')']);
    let action;
    let mut arg = None;
    match parts {
        None => action = raw_action,
        Some((act, "")) => action = act,
        Some((act, a)) => {
            action = act;
            arg = Some(a.trim_end_matches(')').to_string())
        }
    }
    debug!("parse_action: action={action}, arg={arg:?}");

    use Action::*;
    match action {
        "abort" => Some(Abort),
        "accept" => Some(Accept),
        "add-char" => arg.and_then(|a| a.chars().next()).map(AddChar),
        "backward-char" => Some(BackwardChar),
        "backward-delete-char" => Some(BackwardDeleteChar),
        "backward-kill-word" => Some(BackwardKillWord),
        "backward-word" => Some(BackwardWord),
        "beginning-of-line" => Some(BeginningOfLine),
        "clear-screen" => Some(ClearScreen),
        "delete-char" => Some(DeleteChar),
        "down" => Some(Down(arg.and_then(|s| s.parse().ok()).unwrap_or(1))),
        "end-editing" => Some(EndEditing),
        "end-of-line" => Some(EndOfLine),
        "first" | "top" => Some(First),
        "forward-char" => Some(ForwardChar),
        "forward-word" => Some(ForwardWord),
        "ignore" => Some(Ignore),
        "kill-line" => Some(KillLine),
        "last" => Some(Last),
        "select-current" => Some(SelectCurrent),
        "select-row" => Some(SelectRow(arg.and_then(|s| s.parse().ok()).unwrap_or_default())),
        "set-query" => Some(SetQuery(arg.unwrap_or_default())),
        "unix-line-discard" => Some(UnixLineDiscard),
        "unix-word-rubout" => Some(UnixWordRubout),
        "up" => Some(Up(arg.and_then(|s| s.parse().ok()).unwrap_or(1))),
        _ => None,
    }
}
