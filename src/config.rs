//! Configuration loading.
//!
//! The terminal is configured by a JSON file holding the top-level display
//! settings and the declarative menu item list. Records are deserialized
//! as-is; structural validation of the menu happens in
//! [`MenuTree::build`](crate::menu::MenuTree::build).
//!
//! # Example
//!
//! ```json
//! {
//!   "mqtt_topic_prefix": "vault111",
//!   "cursor_blink": false,
//!   "font_color": "0x33FF33",
//!   "menu_items": [
//!     { "title": "Door", "type": "status", "mqtt_topic": "~/door/state" },
//!     { "title": "Door Control", "type": "submenu", "items": [
//!       { "title": "Open", "type": "action", "mqtt_topic": "~/door/set", "mqtt_payload": "open" }
//!     ]}
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, fs, path::Path, path::PathBuf};

use crate::constants::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_FONT_COLOR, DEFAULT_TOPIC_PREFIX, MAX_COLOR,
};

/// A 24-bit RGB color.
///
/// Deserializes from an integer (`65280`) or a hex string (`"0x00FF00"`,
/// `"#00FF00"`). Serializes as `"0xRRGGBB"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color24(u32);

impl Color24 {
    /// Create a color, rejecting values wider than 24 bits.
    pub fn new(value: u32) -> Option<Self> {
        (value <= MAX_COLOR).then_some(Self(value))
    }

    /// Raw `0xRRGGBB` value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Split into red, green and blue channels.
    pub fn rgb(self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();
        (r, g, b)
    }

    fn parse_hex(text: &str) -> Result<u32, String> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .or_else(|| text.strip_prefix('#'))
            .unwrap_or(text);
        u32::from_str_radix(digits, 16).map_err(|e| format!("invalid color '{text}': {e}"))
    }
}

impl fmt::Display for Color24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}

impl Serialize for Color24 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color24 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawColor {
            Int(u32),
            Text(String),
        }

        let value = match RawColor::deserialize(deserializer)? {
            RawColor::Int(value) => value,
            RawColor::Text(text) => Self::parse_hex(&text).map_err(de::Error::custom)?,
        };
        Self::new(value)
            .ok_or_else(|| de::Error::custom(format!("color 0x{value:X} exceeds 24 bits")))
    }
}

/// One declarative menu item record, exactly as written in the config file.
///
/// Every field except `title` and `type` is optional here; which ones are
/// required depends on the item type and is checked when the tree is built.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Display label.
    #[serde(default)]
    pub title: String,
    /// Item type: `submenu`, `action`, `status` or `text_editor`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Child records (submenus only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MenuItemConfig>>,
    /// Topic to publish to (action) or display (status).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mqtt_topic: Option<String>,
    /// Payload published by an action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mqtt_payload: Option<String>,
    /// Open a text editor item as a read-only view.
    #[serde(default)]
    pub readonly: bool,
    /// Topic gating this item's visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_topic: Option<String>,
    /// Value the condition topic must hold for the item to be visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<String>,
    /// Backing file of a text editor item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Line cap of a text editor item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

impl MenuItemConfig {
    /// Create a record with a title and type and nothing else.
    pub fn new(title: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Set `mqtt_topic`.
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.mqtt_topic = Some(topic.into());
        self
    }

    /// Set `mqtt_payload`.
    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.mqtt_payload = Some(payload.into());
        self
    }

    /// Set the visibility gate.
    pub fn condition(mut self, topic: impl Into<String>, value: impl Into<String>) -> Self {
        self.condition_topic = Some(topic.into());
        self.condition_value = Some(value.into());
        self
    }

    /// Set `file_path`.
    pub fn file(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Set `max_entries`.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Mark a text editor item read-only.
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Set child records.
    pub fn items(mut self, items: Vec<MenuItemConfig>) -> Self {
        self.items = Some(items);
        self
    }
}

/// Configuration for the terminal.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TerminalConfig {
    /// Prefix substituted for a leading `~` in item topics.
    pub mqtt_topic_prefix: String,
    /// Play the boot banner before showing the menu.
    pub boot_sequence: bool,
    /// Blink the text cursor.
    pub cursor_blink: bool,
    /// Foreground color.
    pub font_color: Color24,
    /// Background color.
    pub background_color: Color24,
    /// Root menu records.
    pub menu_items: Vec<MenuItemConfig>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            mqtt_topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            boot_sequence: true,
            cursor_blink: true,
            font_color: Color24(DEFAULT_FONT_COLOR),
            background_color: Color24(DEFAULT_BACKGROUND_COLOR),
            menu_items: Vec::new(),
        }
    }
}

impl TerminalConfig {
    /// Returns the default configuration file path.
    ///
    /// Selection priority:
    /// 1. `ROBCO_CONFIG` env var
    /// 2. Platform config dir: `{config_dir}/robco-terminal/config.json`
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("ROBCO_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join("robco-terminal")
            .join("config.json"))
    }

    /// Loads configuration from a file, then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parses configuration from JSON text. No environment overrides.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Applies `ROBCO_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(prefix) = lookup("ROBCO_MQTT_TOPIC_PREFIX") {
            self.mqtt_topic_prefix = prefix;
        }

        if let Some(enabled) = lookup("ROBCO_BOOT_SEQUENCE").as_deref().and_then(parse_flag) {
            self.boot_sequence = enabled;
        }

        if let Some(enabled) = lookup("ROBCO_CURSOR_BLINK").as_deref().and_then(parse_flag) {
            self.cursor_blink = enabled;
        }
    }

    /// Logs the effective configuration.
    pub fn log_summary(&self) {
        log::info!("RobCo Terminal:");
        log::info!("  MQTT Topic Prefix: {}", self.mqtt_topic_prefix);
        log::info!("  Boot Sequence: {}", yes_no(self.boot_sequence));
        log::info!("  Cursor Blink: {}", yes_no(self.cursor_blink));
        log::info!("  Font Color: {}", self.font_color);
        log::info!("  Background Color: {}", self.background_color);
        log::info!("  Menu Items: {}", self.menu_items.len());
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}
