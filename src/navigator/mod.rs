//! Menu navigation state machine.
//!
//! The navigator owns the only mutable view of the menu: where the user is
//! (`path`), which item is selected, and whether a text item is open. It is
//! driven one event at a time and never blocks except on the synchronous
//! backing store.
//!
//! # States
//!
//! ```text
//! Browsing(path) ── Enter on submenu i ──► Browsing(path + [i])
//! Browsing(path + [i]) ── Back ──────────► Browsing(path)
//!
//! Browsing ── Enter on text_editor ──► Editing ── Enter (saved) ──────► Browsing
//!                                              ── Back (clean) ───────► Browsing
//!                                              ── Back, Back (dirty) ─► Browsing
//!
//! Browsing ── Enter on readonly text_editor ──► Viewing ── Back ──► Browsing
//! ```
//!
//! Selection only ever rests on a visible item. Up/Down clamp at the ends
//! of the visible list.
//!
//! # Banners
//!
//! Feedback (activation, save result, errors) is shown as a one-line
//! banner. Any accepted input replaces or clears it; the terminal also
//! expires it after a fixed time using [`Navigator::banner_generation`].

// Rust guideline compliant 2026-02

mod render;

use std::sync::Arc;

use crate::conditions::ConditionTable;
use crate::editor::{TextEditor, TextViewer};
use crate::input::InputEvent;
use crate::menu::{ItemId, ItemKind, MenuItem, MenuTree};
use crate::store::BackingStore;
use crate::transport::Transport;

/// Outcome of feeding one event to the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// State or banner changed; the screen must be redrawn.
    Accepted,
    /// Nothing changed.
    Ignored,
}

/// Banner severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Confirmation of a successful operation.
    Info,
    /// A refused or failed operation.
    Error,
}

/// One-line transient feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Text shown on the banner row.
    pub text: String,
    /// Severity.
    pub kind: BannerKind,
}

/// An open editor and what it edits.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Buffer.
    pub editor: TextEditor,
    /// Item title.
    pub title: String,
    /// Backing file.
    pub file_path: String,
    /// First `Back` on a dirty buffer arms the discard.
    pub discard_armed: bool,
}

/// A read-only file being viewed.
#[derive(Debug, Clone)]
pub struct ViewSession {
    /// Viewer.
    pub viewer: TextViewer,
    /// Item title.
    pub title: String,
}

/// What the navigator is doing at the current path.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Moving through a menu level.
    Browsing,
    /// Scrolling a read-only text item.
    Viewing(ViewSession),
    /// Editing a text item.
    Editing(EditSession),
}

impl Mode {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Browsing => "browsing",
            Self::Viewing(_) => "viewing",
            Self::Editing(_) => "editing",
        }
    }
}

/// Position in the tree.
#[derive(Debug, Clone)]
pub struct NavigatorState {
    /// Child indices from the root; empty at the root.
    pub path: Vec<usize>,
    /// Index of the selected item in the current level, `None` when no
    /// item at this level is visible.
    pub selected: Option<usize>,
    /// Current mode.
    pub mode: Mode,
}

/// The menu state machine.
#[derive(Debug)]
pub struct Navigator {
    tree: Arc<MenuTree>,
    conditions: ConditionTable,
    state: NavigatorState,
    banner: Option<Banner>,
    banner_generation: u64,
}

impl Navigator {
    /// Create a navigator at the root with the first visible item selected.
    pub fn new(tree: Arc<MenuTree>) -> Self {
        let mut nav = Self {
            tree,
            conditions: ConditionTable::new(),
            state: NavigatorState {
                path: Vec::new(),
                selected: None,
                mode: Mode::Browsing,
            },
            banner: None,
            banner_generation: 0,
        };
        nav.state.selected = nav.first_visible();
        nav
    }

    /// Current state.
    pub fn state(&self) -> &NavigatorState {
        &self.state
    }

    /// The menu tree.
    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    /// Current condition values.
    pub fn conditions(&self) -> &ConditionTable {
        &self.conditions
    }

    /// Banner currently shown, if any.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Incremented whenever a new banner is shown.
    pub fn banner_generation(&self) -> u64 {
        self.banner_generation
    }

    /// Remove the banner. Returns `true` if one was shown.
    pub fn clear_banner(&mut self) -> bool {
        self.banner.take().is_some()
    }

    /// Items of the current level.
    pub fn current_level(&self) -> &[ItemId] {
        // A path is only ever pushed for an existing submenu
        self.tree.level(&self.state.path).unwrap_or(&[])
    }

    /// Indices of the visible items at the current level.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.current_level()
            .iter()
            .enumerate()
            .filter(|(_, id)| self.conditions.is_visible(self.tree.item(**id)))
            .map(|(index, _)| index)
            .collect()
    }

    /// The selected item, if any.
    pub fn selected_item(&self) -> Option<&MenuItem> {
        let index = self.state.selected?;
        self.current_level()
            .get(index)
            .map(|&id| self.tree.item(id))
    }

    /// Feed one input event.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        transport: &mut dyn Transport,
        store: &mut dyn BackingStore,
    ) -> Handled {
        let previous_banner = self.banner.take();
        let generation = self.banner_generation;

        let handled = match self.state.mode {
            Mode::Browsing => self.handle_browsing(event, transport, store),
            Mode::Viewing(_) => self.handle_viewing(event),
            Mode::Editing(_) => self.handle_editing(event, store),
        };

        if handled == Handled::Ignored && self.banner_generation == generation {
            self.banner = previous_banner;
        }
        log::trace!("{event:?} -> {handled:?} ({})", self.state.mode.name());
        handled
    }

    /// Record a topic value.
    ///
    /// Returns `true` when the current screen shows something that depends
    /// on the topic and must be redrawn.
    pub fn apply_condition(&mut self, topic: &str, value: &str) -> bool {
        if !self.conditions.update(topic, value) {
            return false;
        }
        log::debug!("Condition {topic} = {value}");

        self.repair_selection();

        let relevant = self
            .current_level()
            .iter()
            .any(|&id| self.tree.item(id).references(topic));
        relevant && matches!(self.state.mode, Mode::Browsing)
    }

    // ------------------------------------------------------------------
    // Browsing
    // ------------------------------------------------------------------

    fn handle_browsing(
        &mut self,
        event: InputEvent,
        transport: &mut dyn Transport,
        store: &mut dyn BackingStore,
    ) -> Handled {
        match event {
            InputEvent::Up => self.select_previous(),
            InputEvent::Down => self.select_next(),
            InputEvent::Enter => self.activate(transport, store),
            InputEvent::Back => self.ascend(),
            InputEvent::Char(_) | InputEvent::Backspace => Handled::Ignored,
        }
    }

    fn select_previous(&mut self) -> Handled {
        let Some(current) = self.state.selected else {
            return Handled::Ignored;
        };
        match self.visible_indices().into_iter().rev().find(|&i| i < current) {
            Some(index) => {
                self.state.selected = Some(index);
                Handled::Accepted
            }
            None => Handled::Ignored,
        }
    }

    fn select_next(&mut self) -> Handled {
        let Some(current) = self.state.selected else {
            return Handled::Ignored;
        };
        match self.visible_indices().into_iter().find(|&i| i > current) {
            Some(index) => {
                self.state.selected = Some(index);
                Handled::Accepted
            }
            None => Handled::Ignored,
        }
    }

    fn activate(
        &mut self,
        transport: &mut dyn Transport,
        store: &mut dyn BackingStore,
    ) -> Handled {
        let Some(index) = self.state.selected else {
            return Handled::Ignored;
        };
        let Some(&id) = self.current_level().get(index) else {
            return Handled::Ignored;
        };
        let tree = Arc::clone(&self.tree);
        let item = tree.item(id);

        match &item.kind {
            ItemKind::Submenu { .. } => {
                self.state.path.push(index);
                self.state.selected = self.first_visible();
                log::debug!("Entered submenu {}", item.title);
                Handled::Accepted
            }
            ItemKind::Action { topic, payload } => match transport.publish(topic, payload) {
                Ok(()) => {
                    log::info!("Activated {}: {topic} <- {payload}", item.title);
                    let text = format!("{} ACTIVATED", item.title.to_uppercase());
                    self.show_banner(text, BannerKind::Info);
                    Handled::Accepted
                }
                Err(e) => {
                    log::warn!("Failed to activate {}: {e}", item.title);
                    Handled::Ignored
                }
            },
            ItemKind::Status { .. } => Handled::Ignored,
            ItemKind::TextEditor {
                file_path,
                readonly: true,
                max_entries,
            } => {
                match TextViewer::load(store, file_path, *max_entries) {
                    Ok(viewer) => {
                        self.state.mode = Mode::Viewing(ViewSession {
                            viewer,
                            title: item.title.clone(),
                        });
                    }
                    Err(e) => {
                        log::error!("{e}");
                        let text = format!("ERROR: CANNOT OPEN {file_path}");
                        self.show_banner(text, BannerKind::Error);
                    }
                }
                Handled::Accepted
            }
            ItemKind::TextEditor {
                file_path,
                readonly: false,
                max_entries,
            } => {
                match TextEditor::load(store, file_path, *max_entries) {
                    Ok(editor) => {
                        self.state.mode = Mode::Editing(EditSession {
                            editor,
                            title: item.title.clone(),
                            file_path: file_path.clone(),
                            discard_armed: false,
                        });
                    }
                    Err(e) => {
                        log::error!("{e}");
                        let text = format!("ERROR: CANNOT OPEN {file_path}");
                        self.show_banner(text, BannerKind::Error);
                    }
                }
                Handled::Accepted
            }
        }
    }

    fn ascend(&mut self) -> Handled {
        let Some(index) = self.state.path.pop() else {
            return Handled::Ignored;
        };
        self.state.selected = Some(index);
        self.repair_selection();
        Handled::Accepted
    }

    // ------------------------------------------------------------------
    // Viewing
    // ------------------------------------------------------------------

    fn handle_viewing(&mut self, event: InputEvent) -> Handled {
        let Mode::Viewing(session) = &mut self.state.mode else {
            return Handled::Ignored;
        };
        let moved = match event {
            InputEvent::Up => session.viewer.scroll_up(),
            InputEvent::Down => session.viewer.scroll_down(),
            InputEvent::Back => {
                self.state.mode = Mode::Browsing;
                true
            }
            InputEvent::Enter | InputEvent::Char(_) | InputEvent::Backspace => false,
        };
        accepted_if(moved)
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    fn handle_editing(&mut self, event: InputEvent, store: &mut dyn BackingStore) -> Handled {
        let Mode::Editing(session) = &mut self.state.mode else {
            return Handled::Ignored;
        };

        let banner = match event {
            InputEvent::Char(c) => match session.editor.insert(c) {
                Ok(changed) => {
                    session.discard_armed &= !changed;
                    return accepted_if(changed);
                }
                Err(full) => {
                    session.discard_armed = false;
                    Banner {
                        text: full.to_string().to_uppercase(),
                        kind: BannerKind::Error,
                    }
                }
            },
            InputEvent::Backspace => {
                let changed = session.editor.backspace();
                session.discard_armed &= !changed;
                return accepted_if(changed);
            }
            InputEvent::Up => {
                let moved = session.editor.move_up();
                session.discard_armed &= !moved;
                return accepted_if(moved);
            }
            InputEvent::Down => {
                let moved = session.editor.move_down();
                session.discard_armed &= !moved;
                return accepted_if(moved);
            }
            InputEvent::Enter => match session.editor.save(store, &session.file_path) {
                Ok(()) => {
                    let text = format!("SAVED {}", session.file_path);
                    self.state.mode = Mode::Browsing;
                    Banner {
                        text,
                        kind: BannerKind::Info,
                    }
                }
                Err(e) => {
                    log::error!("{e}");
                    session.discard_armed = false;
                    Banner {
                        text: format!("ERROR: SAVE FAILED ({})", session.file_path),
                        kind: BannerKind::Error,
                    }
                }
            },
            InputEvent::Back => {
                if !session.editor.is_dirty() {
                    self.state.mode = Mode::Browsing;
                    return Handled::Accepted;
                }
                if session.discard_armed {
                    log::info!("Discarded changes to {}", session.file_path);
                    self.state.mode = Mode::Browsing;
                    Banner {
                        text: "CHANGES DISCARDED".to_string(),
                        kind: BannerKind::Info,
                    }
                } else {
                    session.discard_armed = true;
                    Banner {
                        text: "UNSAVED CHANGES. BACK AGAIN TO DISCARD".to_string(),
                        kind: BannerKind::Error,
                    }
                }
            }
        };

        self.show_banner(banner.text, banner.kind);
        Handled::Accepted
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn show_banner(&mut self, text: String, kind: BannerKind) {
        self.banner = Some(Banner { text, kind });
        self.banner_generation += 1;
    }

    fn first_visible(&self) -> Option<usize> {
        self.visible_indices().first().copied()
    }

    /// Keep the selection on a visible item: the current one if still
    /// visible, else the next visible one, else the previous, else none.
    fn repair_selection(&mut self) {
        let visible = self.visible_indices();
        self.state.selected = match self.state.selected {
            Some(current) if visible.contains(&current) => Some(current),
            Some(current) => visible
                .iter()
                .copied()
                .find(|&i| i > current)
                .or_else(|| visible.iter().copied().rev().find(|&i| i < current)),
            None => visible.first().copied(),
        };
    }
}

fn accepted_if(changed: bool) -> Handled {
    if changed {
        Handled::Accepted
    } else {
        Handled::Ignored
    }
}
