//! Action enum - All possible application actions
//!
//! Components emit Actions in response to events, and `update` processes
//! them to change state.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for animations and polling
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Leave the application
    Quit,

    // ─────────────────────────────────────────────────────────────────────────
    // Row Cursor
    // ─────────────────────────────────────────────────────────────────────────
    /// Move the cursor to the next row
    NextRow,
    /// Move the cursor to the previous row
    PrevRow,
    /// Jump to the first row
    FirstRow,
    /// Jump to the last row
    LastRow,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll the body up one line
    ScrollUp,
    /// Scroll the body down one line
    ScrollDown,
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Scroll left (only when the table is wider than the viewport)
    ScrollLeft,
    /// Scroll right (only when the table is wider than the viewport)
    ScrollRight,

    // ─────────────────────────────────────────────────────────────────────────
    // Refresh
    // ─────────────────────────────────────────────────────────────────────────
    /// Pull gesture: start a refresh
    PullRefresh,
    /// The refresh callback finished; `true` on success
    RefreshFinished(bool),
    /// Flip the host's external `loading` flag
    ToggleLoading,

    // ─────────────────────────────────────────────────────────────────────────
    // Marks
    // ─────────────────────────────────────────────────────────────────────────
    /// Toggle the mark on the row with this id
    ToggleMark(String),
    /// Mark every row, or clear all marks if every row is marked
    ToggleMarkAll,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the key binding overlay
    OpenHelp,
    /// Close the current modal
    CloseModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::Quit => write!(f, "Quit"),
            Action::NextRow => write!(f, "NextRow"),
            Action::PrevRow => write!(f, "PrevRow"),
            Action::FirstRow => write!(f, "FirstRow"),
            Action::LastRow => write!(f, "LastRow"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::ScrollLeft => write!(f, "ScrollLeft"),
            Action::ScrollRight => write!(f, "ScrollRight"),
            Action::PullRefresh => write!(f, "PullRefresh"),
            Action::RefreshFinished(ok) => write!(f, "RefreshFinished({})", ok),
            Action::ToggleLoading => write!(f, "ToggleLoading"),
            Action::ToggleMark(id) => write!(f, "ToggleMark({})", id),
            Action::ToggleMarkAll => write!(f, "ToggleMarkAll"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_payload() {
        assert_eq!(Action::Resize(80, 24).to_string(), "Resize(80, 24)");
        assert_eq!(Action::ToggleMark("7".into()).to_string(), "ToggleMark(7)");
        assert_eq!(Action::RefreshFinished(false).to_string(), "RefreshFinished(false)");
    }
}
