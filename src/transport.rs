//! Publish/subscribe transport bridge.
//!
//! The terminal talks to the outside world through [`Transport`]: action
//! items publish, and watched topics are subscribed at startup with a
//! callback that queues each update onto the terminal's event loop.
//! Callbacks must only enqueue; they run on whatever thread the transport
//! delivers on.
//!
//! [`LoopbackTransport`] is the in-process implementation used by the host
//! binary and tests. It behaves like a broker with retained messages:
//! publishing delivers to local subscribers, and a new subscription
//! immediately receives the topic's last value.

use std::collections::HashMap;
use std::fmt;

/// Callback invoked with each new value of a subscribed topic.
pub type UpdateCallback = Box<dyn Fn(String) + Send + Sync>;

/// Transport failure. Recoverable: logged, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Not connected to the broker.
    Disconnected,
    /// Broker rejected or failed a publish.
    PublishFailed(String),
    /// Broker rejected or failed a subscribe.
    SubscribeFailed(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Transport disconnected"),
            Self::PublishFailed(msg) => write!(f, "Publish failed: {msg}"),
            Self::SubscribeFailed(msg) => write!(f, "Subscribe failed: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Message transport seen by the terminal.
pub trait Transport {
    /// Publish `payload` on `topic`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Disconnected` when the transport is down.
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), TransportError>;

    /// Register `on_update` for every future value of `topic`.
    fn subscribe(&mut self, topic: &str, on_update: UpdateCallback) -> Result<(), TransportError>;
}

/// In-process broker with retained values.
pub struct LoopbackTransport {
    subscribers: HashMap<String, Vec<UpdateCallback>>,
    retained: HashMap<String, String>,
    published: Vec<(String, String)>,
    connected: bool,
}

impl fmt::Debug for LoopbackTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopbackTransport")
            .field("topics", &self.subscribers.keys().collect::<Vec<_>>())
            .field("retained", &self.retained)
            .field("published", &self.published.len())
            .field("connected", &self.connected)
            .finish()
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackTransport {
    /// Create a connected transport with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
            retained: HashMap::new(),
            published: Vec::new(),
            connected: true,
        }
    }

    /// Simulate losing (or regaining) the broker connection.
    pub fn set_connected(&mut self, connected: bool) {
        if self.connected != connected {
            log::info!(
                "Loopback transport {}",
                if connected { "connected" } else { "disconnected" }
            );
        }
        self.connected = connected;
    }

    /// Deliver a value as if it arrived from the broker.
    ///
    /// The value is retained for later subscribers. Works while
    /// disconnected so startup values can be seeded before anything runs.
    pub fn inject(&mut self, topic: &str, value: &str) {
        self.retained.insert(topic.to_string(), value.to_string());
        self.deliver(topic, value);
    }

    /// Every successful publish so far, oldest first.
    pub fn published(&self) -> &[(String, String)] {
        &self.published
    }

    fn deliver(&self, topic: &str, value: &str) {
        if let Some(callbacks) = self.subscribers.get(topic) {
            for callback in callbacks {
                callback(value.to_string());
            }
        }
    }
}

impl Transport for LoopbackTransport {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::Disconnected);
        }
        log::debug!("Publish {topic} <- {payload}");
        self.published.push((topic.to_string(), payload.to_string()));
        self.retained.insert(topic.to_string(), payload.to_string());
        self.deliver(topic, payload);
        Ok(())
    }

    fn subscribe(&mut self, topic: &str, on_update: UpdateCallback) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::Disconnected);
        }
        if let Some(value) = self.retained.get(topic) {
            on_update(value.clone());
        }
        self.subscribers
            .entry(topic.to_string())
            .or_default()
            .push(on_update);
        log::debug!("Subscribed to {topic}");
        Ok(())
    }
}
