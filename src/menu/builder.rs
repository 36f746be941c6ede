//! Menu tree construction and validation.
//!
//! Validation is fail-fast: records are visited in config order (a submenu's
//! children right after the submenu) and the first violated rule aborts the
//! build. Rules per record, in order:
//!
//! ```text
//! 0. title non-empty
//! 1. type in {submenu, action, status, text_editor}   (case-insensitive)
//! 2. action      => mqtt_topic, mqtt_payload
//! 3. status      => mqtt_topic
//! 4. submenu     => items non-empty, no submenu children
//! 5. text_editor => file_path, max_entries > 0 (default 100)
//! ```
//!
//! Empty strings count as missing.

use std::collections::BTreeSet;

use super::{
    Condition, ConfigError, ItemId, ItemKind, ItemRef, MenuItem, MenuTree, ValidationRule,
};
use crate::config::MenuItemConfig;
use crate::constants::{DEFAULT_MAX_ENTRIES, MAX_DEPTH};

impl MenuTree {
    /// Build and validate the tree.
    ///
    /// Topics beginning with `~/` are rewritten to `{topic_prefix}/...`.
    pub fn build(items: &[MenuItemConfig], topic_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder = TreeBuilder {
            nodes: Vec::new(),
            watched: BTreeSet::new(),
            prefix: topic_prefix,
        };

        let mut root = Vec::with_capacity(items.len());
        for (index, record) in items.iter().enumerate() {
            let location = format!("menu_items[{index}]");
            root.push(builder.add(record, location, 1)?);
        }

        log::debug!(
            "Built menu tree: {} nodes, {} watched topics",
            builder.nodes.len(),
            builder.watched.len()
        );

        Ok(Self {
            nodes: builder.nodes,
            root,
            watched_topics: builder.watched.into_iter().collect(),
        })
    }
}

struct TreeBuilder<'a> {
    nodes: Vec<MenuItem>,
    watched: BTreeSet<String>,
    prefix: &'a str,
}

impl TreeBuilder<'_> {
    fn add(
        &mut self,
        record: &MenuItemConfig,
        location: String,
        depth: usize,
    ) -> Result<ItemId, ConfigError> {
        let at = ItemRef {
            location,
            title: record.title.clone(),
        };

        // Rule 0
        if record.title.trim().is_empty() {
            return Err(ConfigError::MissingTitle(at));
        }

        // Rule 1
        let kind_name = record.kind.trim().to_ascii_lowercase();
        let kind = match kind_name.as_str() {
            "action" => {
                let rule = ValidationRule::ActionFields;
                let topic = self.required_topic(record, &at, rule)?;
                let payload = required(record.mqtt_payload.as_deref(), &at, rule, "mqtt_payload")?;
                ItemKind::Action { topic, payload }
            }
            "status" => {
                let rule = ValidationRule::StatusFields;
                let topic = self.required_topic(record, &at, rule)?;
                self.watched.insert(topic.clone());
                ItemKind::Status {
                    topic,
                    payload: present(record.mqtt_payload.as_deref()).map(str::to_string),
                }
            }
            "submenu" => {
                if depth >= MAX_DEPTH {
                    return Err(ConfigError::NestedSubmenu(at));
                }
                let children = self.add_children(record, &at, depth)?;
                ItemKind::Submenu { children }
            }
            "text_editor" => {
                let rule = ValidationRule::EditorFields;
                let file_path = required(record.file_path.as_deref(), &at, rule, "file_path")?;
                let max_entries = match record.max_entries {
                    Some(0) => return Err(ConfigError::InvalidMaxEntries(at)),
                    Some(max) => max,
                    None => DEFAULT_MAX_ENTRIES,
                };
                ItemKind::TextEditor {
                    file_path,
                    readonly: record.readonly,
                    max_entries,
                }
            }
            _ => {
                return Err(ConfigError::UnknownKind {
                    item: at,
                    kind: record.kind.clone(),
                })
            }
        };

        if record.items.is_some() && !matches!(kind, ItemKind::Submenu { .. }) {
            log::warn!("{at}: 'items' ignored on {} item", kind.name());
        }

        let condition = self.condition(record, &at);
        let id = ItemId(self.nodes.len());
        self.nodes.push(MenuItem {
            title: record.title.clone(),
            kind,
            condition,
        });
        Ok(id)
    }

    fn add_children(
        &mut self,
        record: &MenuItemConfig,
        at: &ItemRef,
        depth: usize,
    ) -> Result<Vec<ItemId>, ConfigError> {
        let Some(items) = &record.items else {
            return Err(ConfigError::MissingField {
                item: at.clone(),
                rule: ValidationRule::SubmenuItems,
                field: "items",
            });
        };
        if items.is_empty() {
            return Err(ConfigError::EmptySubmenu(at.clone()));
        }

        items
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let location = format!("{}.items[{index}]", at.location);
                self.add(child, location, depth + 1)
            })
            .collect()
    }

    /// Gate is recorded only when both halves are present.
    fn condition(&mut self, record: &MenuItemConfig, at: &ItemRef) -> Option<Condition> {
        let topic = present(record.condition_topic.as_deref());
        let value = present(record.condition_value.as_deref());
        match (topic, value) {
            (Some(topic), Some(value)) => {
                let topic = expand_topic(topic, self.prefix);
                self.watched.insert(topic.clone());
                Some(Condition {
                    topic,
                    value: value.to_string(),
                })
            }
            (None, None) => None,
            _ => {
                log::warn!("{at}: condition needs condition_topic and condition_value, ignoring");
                None
            }
        }
    }

    fn required_topic(
        &self,
        record: &MenuItemConfig,
        at: &ItemRef,
        rule: ValidationRule,
    ) -> Result<String, ConfigError> {
        required(record.mqtt_topic.as_deref(), at, rule, "mqtt_topic")
            .map(|topic| expand_topic(&topic, self.prefix))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn required(
    value: Option<&str>,
    at: &ItemRef,
    rule: ValidationRule,
    field: &'static str,
) -> Result<String, ConfigError> {
    present(value)
        .map(str::to_string)
        .ok_or_else(|| ConfigError::MissingField {
            item: at.clone(),
            rule,
            field,
        })
}

/// `~/x` becomes `{prefix}/x`; anything else is returned unchanged.
fn expand_topic(topic: &str, prefix: &str) -> String {
    match topic.strip_prefix("~/") {
        Some(rest) => format!("{prefix}/{rest}"),
        None => topic.to_string(),
    }
}
