//! Last-seen values of watched topics.

use std::collections::HashMap;

use crate::menu::MenuItem;

/// Topic → last value map. Entries live for the whole process.
#[derive(Debug, Default, Clone)]
pub struct ConditionTable {
    values: HashMap<String, String>,
}

impl ConditionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value. Returns `true` when it differs from the previous one.
    pub fn update(&mut self, topic: impl Into<String>, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.values.insert(topic.into(), value.clone()) {
            Some(previous) => previous != value,
            None => true,
        }
    }

    /// Last value seen on `topic`.
    pub fn get(&self, topic: &str) -> Option<&str> {
        self.values.get(topic).map(String::as_str)
    }

    /// An item is visible when it has no gate or its gate topic currently
    /// holds exactly the gate value.
    pub fn is_visible(&self, item: &MenuItem) -> bool {
        item.condition
            .as_ref()
            .is_none_or(|cond| self.get(&cond.topic) == Some(cond.value.as_str()))
    }

    /// Number of topics with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no value has arrived yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Condition, ItemKind};

    fn gated(topic: &str, value: &str) -> MenuItem {
        MenuItem {
            title: "Gated".to_string(),
            kind: ItemKind::Status {
                topic: "s".to_string(),
                payload: None,
            },
            condition: Some(Condition {
                topic: topic.to_string(),
                value: value.to_string(),
            }),
        }
    }

    #[test]
    fn test_update_reports_change() {
        let mut table = ConditionTable::new();
        assert!(table.update("door", "open"));
        assert!(!table.update("door", "open"));
        assert!(table.update("door", "closed"));
        assert_eq!(table.get("door"), Some("closed"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_visibility_follows_exact_value() {
        let item = gated("X", "on");
        let mut table = ConditionTable::new();

        // Unknown topic hides the item
        assert!(!table.is_visible(&item));

        table.update("X", "on");
        assert!(table.is_visible(&item));

        table.update("X", "ON");
        assert!(!table.is_visible(&item), "match is case-sensitive");
    }

    #[test]
    fn test_ungated_item_always_visible() {
        let mut item = gated("X", "on");
        item.condition = None;
        assert!(ConditionTable::new().is_visible(&item));
    }
}
