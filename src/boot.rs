//! Startup banner.
//!
//! Lines of [`BOOT_MESSAGES`] appear one every [`BOOT_LINE_INTERVAL`].
//! Once all are shown a cursor blinks after the last line for
//! [`BOOT_HOLD`], then the menu opens. Any key skips straight to the menu.

use std::time::{Duration, Instant};

use crate::constants::{BOOT_HOLD, BOOT_LINE_INTERVAL, BOOT_MESSAGES, LINES_PER_SCREEN};
use crate::display::{Screen, ScreenLine};

/// Boot banner progress.
#[derive(Debug, Clone)]
pub struct BootSequence {
    started: Instant,
    lines: &'static [&'static str],
}

impl BootSequence {
    /// Start the banner at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            started: now,
            lines: BOOT_MESSAGES,
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Number of lines visible at `now`.
    pub fn revealed(&self, now: Instant) -> usize {
        let steps = self.elapsed(now).as_millis() / BOOT_LINE_INTERVAL.as_millis();
        usize::try_from(steps)
            .unwrap_or(usize::MAX)
            .saturating_add(1)
            .min(self.lines.len())
    }

    /// Total time from start until the menu opens.
    pub fn duration(&self) -> Duration {
        BOOT_LINE_INTERVAL * self.lines.len() as u32 + BOOT_HOLD
    }

    /// True once the banner has been fully shown and held.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.duration()
    }

    /// True once every line is visible and the cursor is waiting.
    pub fn is_waiting(&self, now: Instant) -> bool {
        self.revealed(now) == self.lines.len()
    }

    /// Frame at `now`.
    pub fn screen(&self, now: Instant, cursor_visible: bool) -> Screen {
        let shown = self.revealed(now);
        let first = shown.saturating_sub(LINES_PER_SCREEN);
        let mut screen = Screen::default();
        for line in &self.lines[first..shown] {
            screen.push(ScreenLine::plain(*line));
        }

        if self.is_waiting(now) {
            let row = screen.lines.len().saturating_sub(1);
            let col = screen.lines.last().map_or(0, |l| l.text.chars().count());
            screen.cursor = Some((row, col));
            screen.cursor_visible = cursor_visible;
        }
        screen
    }
}
