//! Frame composition for the navigator.
//!
//! Every frame has the same fixed layout so the banner and footer never
//! move:
//!
//! ```text
//! row 0        ROBCO INDUSTRIES (TM) TERMLINK PROTOCOL
//! row 1        level title (underlined inside a submenu or file)
//! row 2        (blank)
//! rows 3..28   item list / file body, scrolled to keep the selection
//! row 28       banner
//! row 29       key hints
//! ```

use super::{Mode, Navigator};
use crate::constants::{
    BROWSE_HINT, CHARS_PER_LINE, EDIT_HINT, HEADER_LINE, LINES_PER_SCREEN, ROOT_TITLE,
    UNKNOWN_STATUS, VIEWPORT_ROWS, VIEW_HINT,
};
use crate::display::{Screen, ScreenLine};
use crate::menu::{ItemKind, MenuItem};

/// First body row.
const BODY_TOP: usize = 3;

/// First row of the window that keeps `focus` visible.
fn window_top(focus: usize) -> usize {
    focus.saturating_sub(VIEWPORT_ROWS - 1)
}

impl Navigator {
    /// Compose the frame for the current state.
    ///
    /// The cursor is placed but left invisible; blinking is the caller's
    /// concern.
    pub fn screen(&self) -> Screen {
        let mut screen = Screen::default();
        screen.push(ScreenLine::plain(HEADER_LINE));

        let hint = match &self.state.mode {
            Mode::Browsing => {
                self.push_title(&mut screen);
                screen.push(ScreenLine::default());
                self.push_items(&mut screen);
                BROWSE_HINT
            }
            Mode::Viewing(session) => {
                screen.push(ScreenLine::underlined(session.title.as_str()));
                screen.push(ScreenLine::default());
                for line in session.viewer.window() {
                    screen.push(ScreenLine::plain(line.as_str()));
                }
                VIEW_HINT
            }
            Mode::Editing(session) => {
                let editor = &session.editor;
                screen.push(ScreenLine::underlined(format!(
                    "{} [{}/{}]",
                    session.title,
                    editor.line_count(),
                    editor.max_entries()
                )));
                screen.push(ScreenLine::default());

                let (row, _) = editor.cursor();
                let top = window_top(row);
                let scroll = editor.visual_scroll(CHARS_PER_LINE);
                for (index, line) in editor.lines().enumerate().skip(top).take(VIEWPORT_ROWS) {
                    let shown: String = if index == row {
                        line.chars().skip(scroll).collect()
                    } else {
                        line.to_string()
                    };
                    screen.push(ScreenLine::plain(shown));
                }
                screen.cursor = Some((
                    BODY_TOP + row - top,
                    editor.visual_cursor().saturating_sub(scroll),
                ));
                EDIT_HINT
            }
        };

        screen.lines.resize(LINES_PER_SCREEN - 2, ScreenLine::default());
        screen.push(match &self.banner {
            Some(banner) => ScreenLine::highlighted(banner.text.as_str()),
            None => ScreenLine::default(),
        });
        screen.push(ScreenLine::plain(hint));
        screen
    }

    fn push_title(&self, screen: &mut Screen) {
        let level_id = self.state.path.split_last().and_then(|(&last, parent)| {
            self.tree.level(parent).and_then(|items| items.get(last)).copied()
        });
        match level_id {
            Some(id) => screen.push(ScreenLine::underlined(self.tree.item(id).title.as_str())),
            None => screen.push(ScreenLine::plain(ROOT_TITLE)),
        }
    }

    fn push_items(&self, screen: &mut Screen) {
        let level = self.current_level();
        let visible = self.visible_indices();
        let focus = self
            .state
            .selected
            .and_then(|selected| visible.iter().position(|&i| i == selected))
            .unwrap_or(0);

        for &index in visible.iter().skip(window_top(focus)).take(VIEWPORT_ROWS) {
            let label = self.label(self.tree.item(level[index]));
            if self.state.selected == Some(index) {
                screen.push(ScreenLine::highlighted(format!("> {label}")));
            } else {
                screen.push(ScreenLine::plain(format!("  {label}")));
            }
        }
    }

    fn label(&self, item: &MenuItem) -> String {
        match &item.kind {
            ItemKind::Status { topic, payload } => {
                let value = self
                    .conditions
                    .get(topic)
                    .or(payload.as_deref())
                    .unwrap_or(UNKNOWN_STATUS);
                format!("{}: {value}", item.title)
            }
            _ => item.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::MenuItemConfig;
    use crate::input::InputEvent;
    use crate::menu::MenuTree;
    use crate::store::MemoryStore;
    use crate::transport::LoopbackTransport;

    fn navigator(items: Vec<MenuItemConfig>) -> Navigator {
        Navigator::new(Arc::new(MenuTree::build(&items, "p").unwrap()))
    }

    #[test]
    fn test_root_layout() {
        let nav = navigator(vec![
            MenuItemConfig::new("Door", "status").topic("door"),
            MenuItemConfig::new("Lights", "action").topic("l").payload("on"),
        ]);
        let screen = nav.screen();

        assert_eq!(screen.lines.len(), LINES_PER_SCREEN);
        assert_eq!(screen.lines[0].text, HEADER_LINE);
        assert_eq!(screen.lines[1].text, ROOT_TITLE);
        assert!(!screen.lines[1].underlined);
        assert_eq!(screen.lines[3].text, "> Door: ---");
        assert!(screen.lines[3].highlighted);
        assert_eq!(screen.lines[4].text, "  Lights");
        assert_eq!(screen.lines[LINES_PER_SCREEN - 1].text, BROWSE_HINT);
        assert!(screen.cursor.is_none());
    }

    #[test]
    fn test_status_shows_value_or_placeholder() {
        let mut nav = navigator(vec![
            MenuItemConfig::new("Door", "status").topic("door"),
            MenuItemConfig::new("Mode", "status").topic("mode").payload("AUTO"),
        ]);
        assert_eq!(nav.screen().lines[4].text, "  Mode: AUTO");

        assert!(nav.apply_condition("door", "SEALED"));
        assert_eq!(nav.screen().lines[3].text, "> Door: SEALED");
    }

    #[test]
    fn test_submenu_title_is_underlined() {
        let mut nav = navigator(vec![MenuItemConfig::new("Reactor", "submenu")
            .items(vec![MenuItemConfig::new("Scram", "action").topic("r").payload("1")])]);
        nav.handle_input(
            InputEvent::Enter,
            &mut LoopbackTransport::new(),
            &mut MemoryStore::new(),
        );

        let screen = nav.screen();
        assert_eq!(screen.lines[1].text, "Reactor");
        assert!(screen.lines[1].underlined);
        assert_eq!(screen.highlighted(), Some("> Scram"));
    }

    #[test]
    fn test_gated_item_absent_until_condition() {
        let mut nav = navigator(vec![
            MenuItemConfig::new("Lobby", "status").topic("lobby"),
            MenuItemConfig::new("Close Door", "action")
                .topic("door/set")
                .payload("close")
                .condition("door", "open"),
        ]);
        assert!(!nav.screen().contains("Close Door"));

        nav.apply_condition("door", "open");
        assert!(nav.screen().contains("Close Door"));

        nav.apply_condition("door", "closed");
        assert!(!nav.screen().contains("Close Door"));
    }

    #[test]
    fn test_long_list_scrolls_to_selection() {
        let items = (0..VIEWPORT_ROWS + 5)
            .map(|i| MenuItemConfig::new(format!("Item {i}"), "status").topic(format!("t{i}")))
            .collect();
        let mut nav = navigator(items);
        let mut transport = LoopbackTransport::new();
        let mut store = MemoryStore::new();
        for _ in 0..VIEWPORT_ROWS + 2 {
            nav.handle_input(InputEvent::Down, &mut transport, &mut store);
        }

        let screen = nav.screen();
        let last_body = BODY_TOP + VIEWPORT_ROWS - 1;
        let expected = format!("> Item {}: ---", VIEWPORT_ROWS + 2);
        assert_eq!(screen.lines[last_body].text, expected);
        assert_eq!(screen.lines[BODY_TOP].text, "  Item 3: ---");
    }

    #[test]
    fn test_banner_row() {
        let mut nav = navigator(vec![MenuItemConfig::new("Vent", "action").topic("v").payload("1")]);
        nav.handle_input(
            InputEvent::Enter,
            &mut LoopbackTransport::new(),
            &mut MemoryStore::new(),
        );
        let screen = nav.screen();
        assert_eq!(screen.lines[LINES_PER_SCREEN - 2].text, "VENT ACTIVATED");
        assert!(screen.lines[LINES_PER_SCREEN - 2].highlighted);
    }

    #[test]
    fn test_editor_frame_places_cursor() {
        let mut nav = navigator(vec![MenuItemConfig::new("Notes", "text_editor")
            .file("/n.txt")
            .max_entries(4)]);
        let mut transport = LoopbackTransport::new();
        let mut store = MemoryStore::new().with_file("/n.txt", "first\n");
        nav.handle_input(InputEvent::Enter, &mut transport, &mut store);
        for event in [InputEvent::Char('\n'), InputEvent::Char('a'), InputEvent::Char('b')] {
            nav.handle_input(event, &mut transport, &mut store);
        }

        let screen = nav.screen();
        assert_eq!(screen.lines[1].text, "Notes [2/4]");
        assert_eq!(screen.lines[BODY_TOP].text, "");
        assert_eq!(screen.lines[BODY_TOP + 1].text, "abfirst");
        assert_eq!(screen.cursor, Some((BODY_TOP + 1, 2)));
        assert_eq!(screen.lines[LINES_PER_SCREEN - 1].text, EDIT_HINT);
    }
}
