//! Line-oriented display abstraction.
//!
//! The terminal describes each frame as a [`Screen`]: a list of text lines
//! with per-line styling and an optional cursor. How the lines become
//! pixels or terminal cells is up to the [`DisplaySurface`].

use crate::constants::CHARS_PER_LINE;

/// One line of a frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLine {
    /// Text, at most [`CHARS_PER_LINE`] characters.
    pub text: String,
    /// Drawn inverted (selected item).
    pub highlighted: bool,
    /// Drawn underlined (submenu title).
    pub underlined: bool,
}

impl ScreenLine {
    /// Plain line, clipped to the screen width.
    pub fn plain(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if let Some((cut, _)) = text.char_indices().nth(CHARS_PER_LINE) {
            text.truncate(cut);
        }
        Self {
            text,
            ..Self::default()
        }
    }

    /// Highlighted line.
    pub fn highlighted(text: impl Into<String>) -> Self {
        Self {
            highlighted: true,
            ..Self::plain(text)
        }
    }

    /// Underlined line.
    pub fn underlined(text: impl Into<String>) -> Self {
        Self {
            underlined: true,
            ..Self::plain(text)
        }
    }
}

/// A full-screen redraw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    /// Lines top to bottom.
    pub lines: Vec<ScreenLine>,
    /// Text cursor as `(row, column)` in screen cells.
    pub cursor: Option<(usize, usize)>,
    /// Whether the cursor is drawn in this frame (blink phase).
    pub cursor_visible: bool,
}

impl Screen {
    /// Append a line.
    pub fn push(&mut self, line: ScreenLine) {
        self.lines.push(line);
    }

    /// Line texts, top to bottom.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    /// True when any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text.contains(needle))
    }

    /// Text of the highlighted line, if any.
    pub fn highlighted(&self) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.highlighted)
            .map(|line| line.text.as_str())
    }
}

/// Receives frames. Rendering never fails from the caller's view;
/// implementations log their own errors.
pub trait DisplaySurface {
    /// Draw `screen`, replacing whatever was shown.
    fn render(&mut self, screen: &Screen);
}

/// Surface that keeps every frame it is given.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    frames: Vec<Screen>,
}

impl RecordingSurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame.
    pub fn last(&self) -> Option<&Screen> {
        self.frames.last()
    }

    /// Number of frames drawn.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl DisplaySurface for RecordingSurface {
    fn render(&mut self, screen: &Screen) {
        self.frames.push(screen.clone());
    }
}
