//! Host keyboard input.
//!
//! Converts crossterm terminal events into the same [`InputEvent`]s the
//! USB keyboard and the button panel produce, so a desktop session drives
//! the menu exactly like the hardware does.
//!
//! # Architecture
//!
//! ```text
//! crossterm::Event ──► event_to_action() ──► HostAction::Input(InputEvent)
//!                                        └─► HostAction::Quit
//! ```
//!
//! # Key map
//!
//! - `Up` / `Down` - move selection or scroll
//! - `Enter` - select, or save inside the editor
//! - `Shift+Enter` / `Ctrl+J` - new line inside the editor
//! - `Esc` - back
//! - `Backspace` - delete before the cursor
//! - `Ctrl+Q` / `Ctrl+C` - quit the host session

// Rust guideline compliant 2026-02

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::InputEvent;

/// What a host key press means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    /// Feed an event to the terminal.
    Input(InputEvent),
    /// Leave the host session.
    Quit,
}

/// Convert a crossterm event to a [`HostAction`].
///
/// Returns `None` for events with no meaning here (mouse, focus, resize,
/// key release).
#[must_use]
pub fn event_to_action(event: &Event) -> Option<HostAction> {
    match event {
        Event::Key(key) => key_event_to_action(key),
        Event::Paste(text) if text.chars().count() == 1 => text
            .chars()
            .next()
            .map(|c| HostAction::Input(InputEvent::Char(c))),
        _ => None,
    }
}

/// Convert a key event to a [`HostAction`].
#[must_use]
pub fn key_event_to_action(key: &KeyEvent) -> Option<HostAction> {
    // Only process key press events
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let event = match key.code {
        KeyCode::Char('q' | 'c') if ctrl => return Some(HostAction::Quit),
        KeyCode::Char('j') if ctrl => InputEvent::Char('\n'),
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => InputEvent::Char(c),
        KeyCode::Enter if shift => InputEvent::Char('\n'),
        KeyCode::Enter => InputEvent::Enter,
        KeyCode::Up => InputEvent::Up,
        KeyCode::Down => InputEvent::Down,
        KeyCode::Esc => InputEvent::Back,
        KeyCode::Backspace => InputEvent::Backspace,
        _ => return None,
    };
    Some(HostAction::Input(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn make_key_ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn input(event: InputEvent) -> Option<HostAction> {
        Some(HostAction::Input(event))
    }

    #[test]
    fn test_ctrl_q_and_ctrl_c_quit() {
        assert_eq!(key_event_to_action(&make_key_ctrl(KeyCode::Char('q'))), Some(HostAction::Quit));
        assert_eq!(key_event_to_action(&make_key_ctrl(KeyCode::Char('c'))), Some(HostAction::Quit));
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key_event_to_action(&make_key(KeyCode::Up)), input(InputEvent::Up));
        assert_eq!(key_event_to_action(&make_key(KeyCode::Down)), input(InputEvent::Down));
        assert_eq!(key_event_to_action(&make_key(KeyCode::Enter)), input(InputEvent::Enter));
        assert_eq!(key_event_to_action(&make_key(KeyCode::Esc)), input(InputEvent::Back));
        assert_eq!(
            key_event_to_action(&make_key(KeyCode::Backspace)),
            input(InputEvent::Backspace)
        );
    }

    #[test]
    fn test_newline_keys() {
        let shift_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT);
        assert_eq!(key_event_to_action(&shift_enter), input(InputEvent::Char('\n')));
        assert_eq!(
            key_event_to_action(&make_key_ctrl(KeyCode::Char('j'))),
            input(InputEvent::Char('\n'))
        );
    }

    #[test]
    fn test_printable_chars() {
        assert_eq!(key_event_to_action(&make_key(KeyCode::Char('a'))), input(InputEvent::Char('a')));
        let upper = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key_event_to_action(&upper), input(InputEvent::Char('A')));
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        assert_eq!(key_event_to_action(&make_key(KeyCode::Tab)), None);
        assert_eq!(key_event_to_action(&make_key(KeyCode::Left)), None);
        assert_eq!(key_event_to_action(&make_key_ctrl(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut key = make_key(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(key_event_to_action(&key), None);
    }

    #[test]
    fn test_non_key_events() {
        assert_eq!(event_to_action(&Event::Resize(80, 30)), None);
        assert_eq!(event_to_action(&Event::FocusGained), None);
        assert_eq!(
            event_to_action(&Event::Key(make_key(KeyCode::Down))),
            input(InputEvent::Down)
        );
    }
}
