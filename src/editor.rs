//! Bounded multi-line text editor and read-only viewer.
//!
//! Each line is a headless [`tui_input::Input`], which owns the line's text
//! and column cursor. The editor adds the line structure on top: a cap on
//! the number of lines, a row cursor and a dirty flag.
//!
//! # File format
//!
//! Plain UTF-8 text, one buffer line per file line, every line terminated
//! by `\n`. An empty file and a missing file both load as one empty line.
//! Invalid UTF-8 is replaced lossily.
//!
//! ```text
//! buffer ["a", "", "b"]  <->  file "a\n\nb\n"
//! ```

// Rust guideline compliant 2026-02

use std::fmt;

use tui_input::{Input, InputRequest};

use crate::constants::VIEWPORT_ROWS;
use crate::store::{BackingStore, PersistenceError, StoreError};

/// A line break was refused because the buffer is at its line cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferFull {
    /// The cap that was hit.
    pub max_entries: usize,
}

impl fmt::Display for BufferFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer full ({} lines max)", self.max_entries)
    }
}

impl std::error::Error for BufferFull {}

/// Split file bytes into at most `max_entries` lines.
fn parse_lines(bytes: &[u8], max_entries: usize, path: &str) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    let body = text.strip_suffix('\n').unwrap_or(&text);
    let mut lines: Vec<String> = body.split('\n').map(str::to_string).collect();
    if lines.len() > max_entries {
        log::warn!(
            "{path}: {} lines exceeds max_entries {max_entries}, truncating",
            lines.len()
        );
        lines.truncate(max_entries);
    }
    lines
}

fn read_lines(
    store: &dyn BackingStore,
    path: &str,
    max_entries: usize,
) -> Result<Vec<String>, PersistenceError> {
    match store.read(path) {
        Ok(bytes) => Ok(parse_lines(&bytes, max_entries, path)),
        Err(StoreError::NotFound) => {
            log::debug!("{path} not found, starting empty");
            Ok(vec![String::new()])
        }
        Err(source) => Err(PersistenceError::Load {
            path: path.to_string(),
            source,
        }),
    }
}

/// Editable line buffer.
#[derive(Debug, Clone)]
pub struct TextEditor {
    lines: Vec<Input>,
    row: usize,
    max_entries: usize,
    dirty: bool,
}

impl TextEditor {
    /// Create an empty buffer (one empty line).
    pub fn new(max_entries: usize) -> Self {
        Self::from_lines(vec![String::new()], max_entries)
    }

    /// Create a buffer from existing lines. The cursor starts at the top.
    ///
    /// Lines past `max_entries` are dropped; an empty list becomes one
    /// empty line.
    pub fn from_lines(mut lines: Vec<String>, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        lines.truncate(max_entries);
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines: lines
                .into_iter()
                .map(|line| Input::new(line).with_cursor(0))
                .collect(),
            row: 0,
            max_entries,
            dirty: false,
        }
    }

    /// Load `path` from the store. A missing file gives an empty buffer.
    pub fn load(
        store: &dyn BackingStore,
        path: &str,
        max_entries: usize,
    ) -> Result<Self, PersistenceError> {
        let lines = read_lines(store, path, max_entries)?;
        log::info!("Opened {path} for editing ({} lines)", lines.len());
        Ok(Self::from_lines(lines, max_entries))
    }

    /// Write the buffer to `path`. Clears the dirty flag on success.
    pub fn save(
        &mut self,
        store: &mut dyn BackingStore,
        path: &str,
    ) -> Result<(), PersistenceError> {
        store
            .write(path, self.contents().as_bytes())
            .map_err(|source| PersistenceError::Save {
                path: path.to_string(),
                source,
            })?;
        self.dirty = false;
        log::info!("Saved {path} ({} lines)", self.lines.len());
        Ok(())
    }

    /// Serialized file content.
    pub fn contents(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line.value());
            out.push('\n');
        }
        out
    }

    /// Insert a character at the cursor. `'\n'` breaks the line.
    ///
    /// Returns `Ok(false)` for characters that cannot be typed (controls).
    pub fn insert(&mut self, c: char) -> Result<bool, BufferFull> {
        if c == '\n' {
            return self.newline().map(|()| true);
        }
        if c.is_control() {
            return Ok(false);
        }
        self.current_mut().handle(InputRequest::InsertChar(c));
        self.dirty = true;
        Ok(true)
    }

    /// Split the current line at the cursor.
    ///
    /// # Errors
    ///
    /// Returns `BufferFull` when the buffer already holds `max_entries`
    /// lines; the buffer is left unchanged.
    pub fn newline(&mut self) -> Result<(), BufferFull> {
        if self.lines.len() >= self.max_entries {
            return Err(BufferFull {
                max_entries: self.max_entries,
            });
        }

        let current = &self.lines[self.row];
        let split = byte_offset(current.value(), current.cursor());
        let (head, tail) = current.value().split_at(split);
        let (head, tail) = (head.to_string(), tail.to_string());

        self.lines[self.row] = Input::new(head);
        self.lines.insert(self.row + 1, Input::new(tail).with_cursor(0));
        self.row += 1;
        self.dirty = true;
        Ok(())
    }

    /// Delete the character before the cursor, joining with the previous
    /// line at column 0. Returns `false` at the very start of the buffer.
    pub fn backspace(&mut self) -> bool {
        if self.current().cursor() > 0 {
            self.current_mut().handle(InputRequest::DeletePrevChar);
        } else if self.row > 0 {
            let tail = self.lines.remove(self.row);
            self.row -= 1;
            let head = self.lines[self.row].value();
            let join_at = head.chars().count();
            let merged = format!("{head}{}", tail.value());
            self.lines[self.row] = Input::new(merged).with_cursor(join_at);
        } else {
            return false;
        }
        self.dirty = true;
        true
    }

    /// Move the cursor one line up, keeping the column where possible.
    pub fn move_up(&mut self) -> bool {
        if self.row == 0 {
            return false;
        }
        self.move_to_row(self.row - 1);
        true
    }

    /// Move the cursor one line down, keeping the column where possible.
    pub fn move_down(&mut self) -> bool {
        if self.row + 1 >= self.lines.len() {
            return false;
        }
        self.move_to_row(self.row + 1);
        true
    }

    fn move_to_row(&mut self, row: usize) {
        let target = std::mem::take(&mut self.lines[row]);
        let column = self.current().cursor().min(target.value().chars().count());
        self.lines[row] = target.with_cursor(column);
        self.row = row;
    }

    fn current(&self) -> &Input {
        &self.lines[self.row]
    }

    fn current_mut(&mut self) -> &mut Input {
        &mut self.lines[self.row]
    }

    /// Cursor as `(line, column)`, column counted in characters.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.current().cursor())
    }

    /// Cursor column in screen cells (wide characters count twice).
    pub fn visual_cursor(&self) -> usize {
        self.current().visual_cursor()
    }

    /// Horizontal scroll of the cursor line for a viewport `width` wide.
    pub fn visual_scroll(&self, width: usize) -> usize {
        self.current().visual_scroll(width)
    }

    /// Buffer lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(Input::value)
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line cap.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// True when the buffer changed since it was loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

/// Scroll-only view of a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextViewer {
    lines: Vec<String>,
    offset: usize,
}

impl TextViewer {
    /// Create a viewer over `lines`, scrolled to the top.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines, offset: 0 }
    }

    /// Load `path` from the store. A missing file shows one empty line.
    pub fn load(
        store: &dyn BackingStore,
        path: &str,
        max_entries: usize,
    ) -> Result<Self, PersistenceError> {
        Ok(Self::new(read_lines(store, path, max_entries)?))
    }

    /// Scroll one line up. Returns `false` at the top.
    pub fn scroll_up(&mut self) -> bool {
        if self.offset == 0 {
            return false;
        }
        self.offset -= 1;
        true
    }

    /// Scroll one line down. Returns `false` once the last line is visible.
    pub fn scroll_down(&mut self) -> bool {
        if self.offset + VIEWPORT_ROWS >= self.lines.len() {
            return false;
        }
        self.offset += 1;
        true
    }

    /// First visible line.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Lines visible at the current offset.
    pub fn window(&self) -> &[String] {
        let end = (self.offset + VIEWPORT_ROWS).min(self.lines.len());
        &self.lines[self.offset..end]
    }

    /// Total number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn type_str(editor: &mut TextEditor, text: &str) {
        for c in text.chars() {
            editor.insert(c).unwrap();
        }
    }

    fn lines(editor: &TextEditor) -> Vec<&str> {
        editor.lines().collect()
    }

    #[test]
    fn test_insert_and_newline() {
        let mut editor = TextEditor::new(10);
        assert!(!editor.is_dirty());

        type_str(&mut editor, "ab\ncd");
        assert_eq!(lines(&editor), vec!["ab", "cd"]);
        assert_eq!(editor.cursor(), (1, 2));
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_newline_splits_at_cursor() {
        let mut editor = TextEditor::from_lines(vec!["héllo".to_string()], 5);
        editor.lines[0] = Input::new("héllo".to_string()).with_cursor(2);

        editor.newline().unwrap();
        assert_eq!(lines(&editor), vec!["hé", "llo"]);
        assert_eq!(editor.cursor(), (1, 0));
    }

    #[test]
    fn test_newline_rejected_at_cap() {
        let mut editor = TextEditor::new(2);
        type_str(&mut editor, "a\nb");

        assert_eq!(editor.insert('\n'), Err(BufferFull { max_entries: 2 }));
        assert_eq!(editor.line_count(), 2);
        assert_eq!(lines(&editor), vec!["a", "b"]);

        // Characters still go in on the last line
        editor.insert('c').unwrap();
        assert_eq!(lines(&editor), vec!["a", "bc"]);
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut editor = TextEditor::new(5);
        type_str(&mut editor, "ab\nc");

        assert!(editor.backspace());
        assert_eq!(lines(&editor), vec!["ab", ""]);
        assert!(editor.backspace());
        assert_eq!(lines(&editor), vec!["ab"]);
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut editor = TextEditor::from_lines(vec!["x".to_string()], 5);
        assert!(!editor.backspace());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_vertical_moves_clamp_column() {
        let mut editor = TextEditor::new(5);
        type_str(&mut editor, "long line\nab");
        assert_eq!(editor.cursor(), (1, 2));

        assert!(editor.move_up());
        assert_eq!(editor.cursor(), (0, 2));
        assert!(!editor.move_up());

        // Column 9 on the long line clamps to 2 on the short one
        editor.lines[0] = Input::new("long line".to_string());
        assert!(editor.move_down());
        assert_eq!(editor.cursor(), (1, 2));
        assert!(!editor.move_down());
    }

    #[test]
    fn test_control_chars_ignored() {
        let mut editor = TextEditor::new(5);
        assert_eq!(editor.insert('\t'), Ok(false));
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = MemoryStore::new();
        let editor = TextEditor::load(&store, "/none.txt", 5).unwrap();
        assert_eq!(lines(&editor), vec![""]);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_load_truncates_to_cap() {
        let store = MemoryStore::new().with_file("/f", "1\n2\n3\n4\n");
        let editor = TextEditor::load(&store, "/f", 3).unwrap();
        assert_eq!(lines(&editor), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_load_replaces_invalid_utf8() {
        let store = MemoryStore::new().with_file("/f", vec![b'o', b'k', 0xFF, b'\n']);
        let editor = TextEditor::load(&store, "/f", 3).unwrap();
        assert_eq!(lines(&editor), vec!["ok\u{FFFD}"]);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut store = MemoryStore::new();
        let buffers: Vec<Vec<&str>> = vec![
            vec![""],
            vec!["one"],
            vec!["a", "", "b"],
            vec!["trailing", ""],
            vec!["ünïcödé", "∑"],
        ];

        for buffer in buffers {
            let owned: Vec<String> = buffer.iter().map(ToString::to_string).collect();
            let mut editor = TextEditor::from_lines(owned, 5);
            editor.save(&mut store, "/rt").unwrap();

            let loaded = TextEditor::load(&store, "/rt", 5).unwrap();
            assert_eq!(lines(&loaded), buffer, "round trip of {buffer:?}");
        }
    }

    #[test]
    fn test_save_failure_keeps_dirty() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut editor = TextEditor::new(5);
        editor.insert('x').unwrap();

        let err = editor.save(&mut store, "/f").unwrap_err();
        assert!(matches!(err, PersistenceError::Save { .. }));
        assert!(editor.is_dirty());

        store.set_fail_writes(false);
        editor.save(&mut store, "/f").unwrap();
        assert!(!editor.is_dirty());
        assert_eq!(store.get("/f"), Some(&b"x\n"[..]));
    }

    #[test]
    fn test_viewer_scroll_clamps() {
        let lines: Vec<String> = (0..VIEWPORT_ROWS + 2).map(|i| i.to_string()).collect();
        let mut viewer = TextViewer::new(lines);

        assert!(!viewer.scroll_up());
        assert!(viewer.scroll_down());
        assert!(viewer.scroll_down());
        assert!(!viewer.scroll_down(), "last line already visible");
        assert_eq!(viewer.offset(), 2);
        assert_eq!(viewer.window().len(), VIEWPORT_ROWS);
        assert_eq!(viewer.window()[0], "2");
    }

    #[test]
    fn test_viewer_short_file_does_not_scroll() {
        let mut viewer = TextViewer::new(vec!["only".to_string()]);
        assert!(!viewer.scroll_down());
        assert_eq!(viewer.window(), ["only".to_string()]);
    }
}
