//! Terminal-wide constants for robco-terminal.
//!
//! This module centralizes the timing values, screen geometry and fixed
//! screen text used by the terminal. Constants are grouped by domain.
//!
//! # Categories
//!
//! - **Timing**: Boot reveal, cursor blink, banner lifetime, event loop tick
//! - **Screen**: Character grid of the 800x480 panel
//! - **Menu**: Tree limits and configuration defaults
//! - **Text**: Header, footer and boot banner lines

use std::time::Duration;

// ============================================================================
// Timing
// ============================================================================

/// Delay between revealed boot banner lines.
pub const BOOT_LINE_INTERVAL: Duration = Duration::from_millis(200);

/// How long the fully revealed boot banner stays up before the menu opens.
pub const BOOT_HOLD: Duration = Duration::from_secs(2);

/// Cursor blink half-period.
///
/// The cursor is toggled every interval while a cursor is on screen and
/// `cursor_blink` is enabled.
pub const CURSOR_BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Lifetime of a transient banner (activation flash, save result, errors).
pub const BANNER_DURATION: Duration = Duration::from_secs(2);

/// Event loop tick interval.
///
/// Drives boot reveal, blink and banner expiry. 100ms keeps all three
/// within one tick of their nominal timing.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Minimum time between two accepted presses of the same button.
pub const BUTTON_DEBOUNCE: Duration = Duration::from_millis(30);

// ============================================================================
// Screen
// ============================================================================

/// Characters per line (800px panel / 10px glyphs).
pub const CHARS_PER_LINE: usize = 80;

/// Lines per screen (480px panel / 16px glyphs).
pub const LINES_PER_SCREEN: usize = 30;

/// Rows available to the item list or text body.
///
/// Header, title, title rule, banner and footer take one row each.
pub const VIEWPORT_ROWS: usize = LINES_PER_SCREEN - 5;

// ============================================================================
// Menu
// ============================================================================

/// Maximum menu depth: root menu → submenu → leaves.
pub const MAX_DEPTH: usize = 2;

/// Default line cap for text editor items.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default MQTT topic prefix.
pub const DEFAULT_TOPIC_PREFIX: &str = "robco_terminal";

/// Default font color (terminal green).
pub const DEFAULT_FONT_COLOR: u32 = 0x00FF00;

/// Default background color.
pub const DEFAULT_BACKGROUND_COLOR: u32 = 0x000000;

/// Largest 24-bit color value.
pub const MAX_COLOR: u32 = 0xFF_FFFF;

// ============================================================================
// Text
// ============================================================================

/// First line of every menu screen.
pub const HEADER_LINE: &str = "ROBCO INDUSTRIES (TM) TERMLINK PROTOCOL";

/// Level title shown at the root menu.
pub const ROOT_TITLE: &str = "WELCOME, OVERSEER";

/// Placeholder for a status value that has not been received yet.
pub const UNKNOWN_STATUS: &str = "---";

/// Footer hint while browsing.
pub const BROWSE_HINT: &str = "ARROWS: NAVIGATE  ENTER: SELECT  ESC: BACK";

/// Footer hint while viewing a read-only file.
pub const VIEW_HINT: &str = "ARROWS: SCROLL  ESC: BACK";

/// Footer hint while editing.
pub const EDIT_HINT: &str = "ENTER: SAVE  SHIFT+ENTER: NEW LINE  ESC: EXIT";

/// Boot banner revealed line by line at startup.
pub const BOOT_MESSAGES: &[&str] = &[
    "RobCo Industries (TM) Termlink Protocol",
    "Established 2075",
    "",
    "Initializing...",
    "Boot Sequence Started",
    "Loading System Drivers...",
    "Checking Memory Banks...",
    "Network Interface: ONLINE",
    "MQTT Client: CONNECTING...",
    "",
    "System Status: NOMINAL",
    "Security Level: AUTHORIZED",
    "",
    "Welcome to Vault-Tec Terminal System",
    "Have a Nice Day!",
    "",
    "Press any key to continue...",
];
