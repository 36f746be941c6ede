//! Immutable menu tree.
//!
//! The tree is built once at startup from the configuration records and
//! shared behind an `Arc` for the life of the process. Nodes live in a flat
//! arena and refer to their children by [`ItemId`].
//!
//! # Architecture
//!
//! ```text
//! MenuTree
//! ├── nodes: Vec<MenuItem>          (arena, indexed by ItemId)
//! ├── root:  Vec<ItemId>            (root level, config order)
//! └── watched_topics: Vec<String>   (condition + status topics, sorted)
//!
//! root ──► [Status] [Submenu] [Action]
//!                      │
//!                      └──► [Action] [TextEditor]      (depth 2, leaves only)
//! ```
//!
//! Depth is capped at [`MAX_DEPTH`](crate::constants::MAX_DEPTH): a submenu
//! may only contain leaves. The cap is enforced by
//! [`MenuTree::build`]; everything here can assume it holds.

// Rust guideline compliant 2026-02

mod builder;
mod error;

pub use error::{ConfigError, ItemRef, ValidationRule};

use std::fmt::Write as _;

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(usize);

impl ItemId {
    /// Arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Visibility gate: the item is shown only while `topic` holds `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Watched topic.
    pub topic: String,
    /// Required value.
    pub value: String,
}

/// What an item does, with exactly the fields that kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// Opens a child level.
    Submenu {
        /// Children in config order. Never empty, never submenus.
        children: Vec<ItemId>,
    },
    /// Publishes `payload` to `topic` when activated.
    Action {
        /// Destination topic.
        topic: String,
        /// Published payload.
        payload: String,
    },
    /// Shows the last value seen on `topic`.
    Status {
        /// Displayed topic.
        topic: String,
        /// Placeholder shown until the first value arrives.
        payload: Option<String>,
    },
    /// Opens a line-bounded text file for editing or viewing.
    TextEditor {
        /// Backing file.
        file_path: String,
        /// Open as a scroll-only view.
        readonly: bool,
        /// Line cap (> 0).
        max_entries: usize,
    },
}

impl ItemKind {
    /// Normalized kind name as written in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submenu { .. } => "submenu",
            Self::Action { .. } => "action",
            Self::Status { .. } => "status",
            Self::TextEditor { .. } => "text_editor",
        }
    }
}

/// A node in the menu tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Display label (non-empty).
    pub title: String,
    /// Kind and kind-specific fields.
    pub kind: ItemKind,
    /// Optional visibility gate.
    pub condition: Option<Condition>,
}

impl MenuItem {
    /// True for submenu items.
    pub fn is_submenu(&self) -> bool {
        matches!(self.kind, ItemKind::Submenu { .. })
    }

    /// True when the item's rendering depends on `topic`, either through its
    /// gate or as a status display.
    pub fn references(&self, topic: &str) -> bool {
        let gated = self.condition.as_ref().is_some_and(|c| c.topic == topic);
        let shown = matches!(&self.kind, ItemKind::Status { topic: t, .. } if t == topic);
        gated || shown
    }
}

/// The immutable menu tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTree {
    nodes: Vec<MenuItem>,
    root: Vec<ItemId>,
    watched_topics: Vec<String>,
}

impl MenuTree {
    /// Items of the root level.
    pub fn root_items(&self) -> &[ItemId] {
        &self.root
    }

    /// Look up a node.
    ///
    /// Ids are only handed out by this tree, so the lookup cannot miss.
    pub fn item(&self, id: ItemId) -> &MenuItem {
        &self.nodes[id.0]
    }

    /// Children of a submenu; empty for leaves.
    pub fn children(&self, id: ItemId) -> &[ItemId] {
        match &self.item(id).kind {
            ItemKind::Submenu { children } => children,
            _ => &[],
        }
    }

    /// Items at a navigation path.
    ///
    /// `path` holds child indices from the root. Returns `None` when an index
    /// is out of range or does not name a submenu.
    pub fn level(&self, path: &[usize]) -> Option<&[ItemId]> {
        let mut items: &[ItemId] = &self.root;
        for &index in path {
            let id = *items.get(index)?;
            if !self.item(id).is_submenu() {
                return None;
            }
            items = self.children(id);
        }
        Some(items)
    }

    /// Topics the terminal must subscribe to: every condition topic and
    /// every status topic, sorted and deduplicated.
    pub fn watched_topics(&self) -> &[String] {
        &self.watched_topics
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the menu has no items at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indented text outline of the tree.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for &id in &self.root {
            self.write_outline(&mut out, id, 0);
        }
        out
    }

    fn write_outline(&self, out: &mut String, id: ItemId, depth: usize) {
        let item = self.item(id);
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}{} [{}]", item.title, item.kind.name());
        match &item.kind {
            ItemKind::Action { topic, payload } => {
                let _ = write!(out, " {topic} <- {payload}");
            }
            ItemKind::Status { topic, .. } => {
                let _ = write!(out, " {topic}");
            }
            ItemKind::TextEditor {
                file_path,
                readonly,
                max_entries,
            } => {
                let mode = if *readonly { "ro" } else { "rw" };
                let _ = write!(out, " {file_path} ({mode}, max {max_entries})");
            }
            ItemKind::Submenu { .. } => {}
        }
        if let Some(cond) = &item.condition {
            let _ = write!(out, " if {} == {}", cond.topic, cond.value);
        }
        out.push('\n');
        for &child in self.children(id) {
            self.write_outline(out, child, depth + 1);
        }
    }
}
