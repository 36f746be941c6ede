//! Input sources.
//!
//! Every physical source is normalized into one stream of [`InputEvent`]s
//! before it reaches the navigator:
//!
//! ```text
//! GPIO buttons ──► ButtonPanel ──┐
//! USB keyboard ──► HidKeyboard ──┼──► InputEvent ──► Terminal queue
//! Host terminal ─► tui::input ───┘
//! ```
//!
//! Adapters are pure state machines; the threads that read the hardware
//! live in the binary.

pub mod buttons;
pub mod hid;

pub use buttons::{Button, ButtonPanel};
pub use hid::{HidKeyboard, ReportReader, HID_REPORT_LEN};

/// A normalized user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Previous item, previous line, or scroll up.
    Up,
    /// Next item, next line, or scroll down.
    Down,
    /// Activate the selected item, or commit the editor.
    Enter,
    /// Leave the current level, view or editor.
    Back,
    /// Typed character. `'\n'` is a line break.
    Char(char),
    /// Delete the character before the cursor.
    Backspace,
}
