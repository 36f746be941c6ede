//! Terminal state guard for RAII cleanup.
//!
//! The host surface draws on the alternate screen in raw mode. This guard
//! puts the terminal into that state and restores it on drop, including
//! when the process unwinds from a panic.

use std::io::{self, stdout};

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Guard that restores the terminal on drop.
///
/// When dropped, this guard:
/// - Disables raw mode
/// - Leaves the alternate screen
/// - Shows the cursor
///
/// # Example
///
/// ```ignore
/// fn run_host() -> anyhow::Result<()> {
///     let _guard = TerminalGuard::enter()?;
///     // Draw frames...
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct TerminalGuard;

impl TerminalGuard {
    /// Creates a guard without touching the terminal.
    ///
    /// Restores terminal state when dropped. Use when setup was done
    /// elsewhere.
    pub fn new() -> Self {
        Self
    }

    /// Enter raw mode and the alternate screen, returning the guard that
    /// undoes both.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // Constructed before the next step so a failure still restores raw mode
        let guard = Self;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }

    /// Best-effort restore, shared with the panic hook.
    pub fn restore() {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        // Try to show cursor
        let _ = execute!(stdout(), cursor::Show);
    }
}

impl Default for TerminalGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Self::restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_guard_creation() {
        // Just verify we can create one without panicking
        let _guard = TerminalGuard::new();
        let _guard2 = TerminalGuard::default();
    }

    #[test]
    fn test_restore_without_setup_is_harmless() {
        TerminalGuard::restore();
        TerminalGuard::restore();
    }
}
