//! TUI - host terminal adapters.
//!
//! On a desktop the terminal runs inside a regular terminal emulator
//! instead of on the panel hardware. This module provides the pieces that
//! make that work; none of the menu logic lives here.
//!
//! # Architecture
//!
//! ```text
//! keyboard thread ── crossterm::Event ──► input::event_to_action ──► EventSender
//!
//! Terminal ── Screen ──► render::TerminalSurface ──► ratatui ──► stdout
//!                                  ▲
//!                      guard::TerminalGuard (raw mode, alternate screen)
//! ```
//!
//! # Modules
//!
//! - [`guard`] - Terminal state RAII guard for cleanup
//! - [`input`] - crossterm key to [`crate::input::InputEvent`] mapping
//! - [`render`] - ratatui-backed [`crate::display::DisplaySurface`]

// Rust guideline compliant 2026-02

pub mod guard;
pub mod input;
pub mod render;

#[doc(inline)]
pub use guard::TerminalGuard;
#[doc(inline)]
pub use input::{event_to_action, key_event_to_action, HostAction};
#[doc(inline)]
pub use render::{screen_area, TerminalSurface};
