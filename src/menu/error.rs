//! Menu construction errors.

use std::fmt;

/// Structural rule checked while building the menu tree.
///
/// Rules are checked in declaration order and the first violation wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// Every item needs a non-empty title.
    TitleRequired,
    /// The item type must be one of the four known kinds.
    KnownKind,
    /// Actions need a topic and a payload.
    ActionFields,
    /// Status items need a topic.
    StatusFields,
    /// Submenus need non-submenu children.
    SubmenuItems,
    /// Text editors need a file path and a positive line cap.
    EditorFields,
}

impl ValidationRule {
    /// Rule number as listed in the configuration reference.
    pub fn number(self) -> u8 {
        match self {
            Self::TitleRequired => 0,
            Self::KnownKind => 1,
            Self::ActionFields => 2,
            Self::StatusFields => 3,
            Self::SubmenuItems => 4,
            Self::EditorFields => 5,
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TitleRequired => "title required",
            Self::KnownKind => "type must be submenu, action, status or text_editor",
            Self::ActionFields => "action requires mqtt_topic and mqtt_payload",
            Self::StatusFields => "status requires mqtt_topic",
            Self::SubmenuItems => "submenu requires non-submenu items",
            Self::EditorFields => "text_editor requires file_path and max_entries > 0",
        };
        write!(f, "rule {}: {text}", self.number())
    }
}

/// Points at one record in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    /// Path of the record, e.g. `menu_items[1].items[0]`.
    pub location: String,
    /// Title of the record (may be empty).
    pub title: String,
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "{}", self.location)
        } else {
            write!(f, "{} (\"{}\")", self.location, self.title)
        }
    }
}

/// Error returned when the menu configuration is structurally invalid.
///
/// Fatal at startup. Each variant names the offending item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Title missing or empty.
    MissingTitle(ItemRef),
    /// Type not one of the known kinds.
    UnknownKind {
        /// Offending item.
        item: ItemRef,
        /// Type as written.
        kind: String,
    },
    /// A field required by the item's type is missing or empty.
    MissingField {
        /// Offending item.
        item: ItemRef,
        /// Rule requiring the field.
        rule: ValidationRule,
        /// Config field name.
        field: &'static str,
    },
    /// Submenu without children.
    EmptySubmenu(ItemRef),
    /// Submenu nested inside another submenu.
    NestedSubmenu(ItemRef),
    /// `max_entries` set to zero.
    InvalidMaxEntries(ItemRef),
}

impl ConfigError {
    /// The rule this error violates.
    pub fn rule(&self) -> ValidationRule {
        match self {
            Self::MissingTitle(_) => ValidationRule::TitleRequired,
            Self::UnknownKind { .. } => ValidationRule::KnownKind,
            Self::MissingField { rule, .. } => *rule,
            Self::EmptySubmenu(_) | Self::NestedSubmenu(_) => ValidationRule::SubmenuItems,
            Self::InvalidMaxEntries(_) => ValidationRule::EditorFields,
        }
    }

    /// The offending item.
    pub fn item(&self) -> &ItemRef {
        match self {
            Self::MissingTitle(item)
            | Self::EmptySubmenu(item)
            | Self::NestedSubmenu(item)
            | Self::InvalidMaxEntries(item)
            | Self::UnknownKind { item, .. }
            | Self::MissingField { item, .. } => item,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle(item) => write!(f, "{item}: missing title"),
            Self::UnknownKind { item, kind } => write!(f, "{item}: unknown type '{kind}'"),
            Self::MissingField { item, rule, field } => {
                write!(f, "{item}: missing {field} ({rule})")
            }
            Self::EmptySubmenu(item) => write!(f, "{item}: submenu has no items"),
            Self::NestedSubmenu(item) => {
                write!(f, "{item}: submenu nested too deep (max depth 2)")
            }
            Self::InvalidMaxEntries(item) => write!(f, "{item}: max_entries must be > 0"),
        }
    }
}

impl std::error::Error for ConfigError {}
