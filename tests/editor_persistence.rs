//! Integration tests for text files saved through the terminal onto a real
//! directory.

use std::fs;
use std::sync::Arc;
use std::time::Instant;

use robco_terminal::editor::{TextEditor, TextViewer};
use robco_terminal::{
    event_channel, BackingStore, FsStore, InputEvent, LoopbackTransport, MenuItemConfig, MenuTree,
    Mode, RecordingSurface, Terminal, TerminalConfig, TerminalEvent,
};
use tempfile::TempDir;

type FsTerminal = Terminal<LoopbackTransport, FsStore, RecordingSurface>;

fn notes_terminal(root: &std::path::Path) -> FsTerminal {
    let config = TerminalConfig {
        boot_sequence: false,
        menu_items: vec![
            MenuItemConfig::new("Notes", "text_editor")
                .file("logs/notes.txt")
                .max_entries(10),
            MenuItemConfig::new("Manual", "text_editor")
                .file("manual.txt")
                .readonly(),
        ],
        ..TerminalConfig::default()
    };
    let tree = MenuTree::build(&config.menu_items, &config.mqtt_topic_prefix).unwrap();
    let now = Instant::now();
    let mut terminal = Terminal::new(
        Arc::new(tree),
        &config,
        LoopbackTransport::new(),
        FsStore::new(root),
        RecordingSurface::new(),
        now,
    );
    let (tx, _rx) = event_channel();
    terminal.start(&tx, now);
    terminal
}

fn type_text(terminal: &mut FsTerminal, text: &str) {
    for c in text.chars() {
        terminal.handle(TerminalEvent::Input(InputEvent::Char(c)), Instant::now());
    }
}

fn press(terminal: &mut FsTerminal, event: InputEvent) {
    terminal.handle(TerminalEvent::Input(event), Instant::now());
}

#[test]
fn test_save_writes_file_and_reopen_restores_lines() {
    let dir = TempDir::new().unwrap();
    let mut terminal = notes_terminal(dir.path());

    press(&mut terminal, InputEvent::Enter);
    type_text(&mut terminal, "reactor ok\ndoor sealed");
    press(&mut terminal, InputEvent::Enter);

    assert!(matches!(terminal.navigator().state().mode, Mode::Browsing));
    let on_disk = fs::read_to_string(dir.path().join("logs/notes.txt")).unwrap();
    assert_eq!(on_disk, "reactor ok\ndoor sealed\n");

    press(&mut terminal, InputEvent::Enter);
    let Mode::Editing(session) = &terminal.navigator().state().mode else {
        panic!("expected editing");
    };
    let lines: Vec<&str> = session.editor.lines().collect();
    assert_eq!(lines, vec!["reactor ok", "door sealed"]);
    assert!(!session.editor.is_dirty());
}

#[test]
fn test_readonly_item_views_existing_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("manual.txt"), "STEP 1\nSTEP 2\n").unwrap();
    let mut terminal = notes_terminal(dir.path());

    press(&mut terminal, InputEvent::Down);
    press(&mut terminal, InputEvent::Enter);

    assert!(matches!(terminal.navigator().state().mode, Mode::Viewing(_)));
    let frame = terminal.display().last().unwrap();
    assert!(frame.contains("STEP 1"));
    assert!(frame.contains("STEP 2"));
}

#[test]
fn test_unreadable_file_shows_error() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("manual.txt")).unwrap();
    let mut terminal = notes_terminal(dir.path());

    press(&mut terminal, InputEvent::Down);
    press(&mut terminal, InputEvent::Enter);

    assert!(matches!(terminal.navigator().state().mode, Mode::Browsing));
    assert!(terminal
        .display()
        .last()
        .unwrap()
        .contains("ERROR: CANNOT OPEN manual.txt"));
}

#[test]
fn test_editor_round_trip_through_fs_store() {
    let dir = TempDir::new().unwrap();
    let mut store = FsStore::new(dir.path());

    let mut editor = TextEditor::from_lines(vec!["alpha".to_string(), String::new()], 5);
    for c in "beta".chars() {
        editor.insert(c).unwrap();
    }
    editor.save(&mut store, "/round.txt").unwrap();
    assert!(store.read("round.txt").is_ok());

    let reloaded = TextEditor::load(&store, "round.txt", 5).unwrap();
    assert_eq!(reloaded.contents(), editor.contents());

    let viewer = TextViewer::load(&store, "round.txt", 5).unwrap();
    assert_eq!(viewer.line_count(), reloaded.line_count());
}
