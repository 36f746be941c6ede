//! Host display surface.
//!
//! Draws [`Screen`]s into an 80x30 region centered in the host terminal,
//! using the configured font and background colors.
//!
//! # Architecture
//!
//! ```text
//! Terminal ──Screen──► TerminalSurface::render() ──► ratatui::Terminal<B>
//!                                                       │
//!                               CrosstermBackend (host) ┘ TestBackend (tests)
//! ```
//!
//! Highlighted lines swap foreground and background; underlined lines get
//! [`Modifier::UNDERLINED`]. The cursor is only placed when the frame asks
//! for it to be visible, otherwise ratatui hides it.

// Rust guideline compliant 2026-02

use std::io::{self, Stdout};

use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph},
    Frame, Terminal,
};

use crate::config::Color24;
use crate::constants::{CHARS_PER_LINE, LINES_PER_SCREEN};
use crate::display::{DisplaySurface, Screen, ScreenLine};

/// Region of `full` the 80x30 screen occupies, centered and clipped.
pub fn screen_area(full: Rect) -> Rect {
    let width = (CHARS_PER_LINE as u16).min(full.width);
    let height = (LINES_PER_SCREEN as u16).min(full.height);
    Rect {
        x: full.x + (full.width - width) / 2,
        y: full.y + (full.height - height) / 2,
        width,
        height,
    }
}

/// Foreground and background colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    font: Color,
    background: Color,
}

impl Palette {
    fn new(font: Color24, background: Color24) -> Self {
        let rgb = |color: Color24| {
            let (r, g, b) = color.rgb();
            Color::Rgb(r, g, b)
        };
        Self {
            font: rgb(font),
            background: rgb(background),
        }
    }

    fn base(self) -> Style {
        Style::default().fg(self.font).bg(self.background)
    }

    fn line_style(self, line: &ScreenLine) -> Style {
        let style = if line.highlighted {
            Style::default().fg(self.background).bg(self.font)
        } else {
            self.base()
        };
        if line.underlined {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        }
    }

    fn draw(self, frame: &mut Frame<'_>, screen: &Screen) {
        let full = frame.area();
        frame.render_widget(Block::default().style(self.base()), full);

        let area = screen_area(full);
        let lines: Vec<Line<'_>> = screen
            .lines
            .iter()
            .map(|line| Line::styled(line.text.as_str(), self.line_style(line)))
            .collect();
        frame.render_widget(Paragraph::new(lines).style(self.base()), area);

        if let Some((row, col)) = screen.cursor.filter(|_| screen.cursor_visible) {
            let row = (row as u16).min(area.height.saturating_sub(1));
            let col = (col as u16).min(area.width.saturating_sub(1));
            frame.set_cursor_position((area.x + col, area.y + row));
        }
    }
}

/// [`DisplaySurface`] backed by a ratatui terminal.
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    palette: Palette,
}

impl<B: Backend> std::fmt::Debug for TerminalSurface<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSurface")
            .field("palette", &self.palette)
            .finish_non_exhaustive()
    }
}

impl TerminalSurface<CrosstermBackend<Stdout>> {
    /// Surface drawing to stdout. The caller sets up raw mode and the
    /// alternate screen (see [`super::TerminalGuard::enter`]).
    pub fn stdout(font: Color24, background: Color24) -> io::Result<Self> {
        Self::new(CrosstermBackend::new(io::stdout()), font, background)
    }
}

impl<B: Backend> TerminalSurface<B> {
    /// Wrap `backend`.
    pub fn new(backend: B, font: Color24, background: Color24) -> Result<Self, B::Error> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            palette: Palette::new(font, background),
        })
    }

    /// Underlying backend.
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> DisplaySurface for TerminalSurface<B> {
    fn render(&mut self, screen: &Screen) {
        let palette = self.palette;
        if let Err(e) = self.terminal.draw(|frame| palette.draw(frame, screen)) {
            log::error!("Failed to draw frame: {e}");
        }
    }
}
