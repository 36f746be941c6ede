//! RobCo Terminal - condition-gated menu terminal.
//!
//! A retro 80x30 text terminal that walks a configured menu tree, publishes
//! messages when actions are chosen, shows live status values, hides items
//! whose gating condition is not met, and edits small line-oriented files.
//!
//! # Architecture
//!
//! The crate follows a single-consumer event loop:
//!
//! - **Terminal** - Owns the queue, boot banner, blink and banner timers
//! - **Navigator** - Browsing / Viewing / Editing state machine
//! - **MenuTree** - Validated, immutable arena built from the JSON config
//! - **ConditionTable** - Last value seen per watched topic
//! - **Collaborators** - `Transport`, `BackingStore` and `DisplaySurface`
//!   traits, injected at construction
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and env overrides
//! - [`menu`] - Tree types, builder and validation errors
//! - [`navigator`] - Navigation state machine and frame composition
//! - [`editor`] - Bounded line editor and read-only viewer
//! - [`input`] - HID keyboard decoding and button debounce
//! - [`terminal`] - Event loop
//! - [`tui`] - Host terminal adapters (crossterm input, ratatui surface)

// Rust guideline compliant 2026-02

pub mod boot;
pub mod conditions;
pub mod config;
pub mod constants;
pub mod display;
pub mod editor;
pub mod input;
pub mod menu;
pub mod navigator;
pub mod store;
pub mod terminal;
pub mod transport;
pub mod tui;

// Re-export commonly used types
pub use conditions::ConditionTable;
pub use config::{Color24, MenuItemConfig, TerminalConfig};
pub use display::{DisplaySurface, RecordingSurface, Screen, ScreenLine};
pub use input::InputEvent;
pub use menu::{ConfigError, MenuTree};
pub use navigator::{Handled, Mode, Navigator};
pub use store::{BackingStore, FsStore, MemoryStore, PersistenceError, StoreError};
pub use terminal::{event_channel, EventSender, Terminal, TerminalEvent};
pub use transport::{LoopbackTransport, Transport, TransportError};
