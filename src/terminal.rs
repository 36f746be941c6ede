//! Top-level terminal: event queue, boot banner, blink and banner timing.
//!
//! The terminal is the single consumer of every event in the system.
//! Producers (keyboard reader, HID reader, transport callbacks) only push
//! [`TerminalEvent`]s onto an unbounded queue; [`Terminal::run`] drains it
//! one event at a time and interleaves a fixed tick for time-based work.
//!
//! # Architecture
//!
//! ```text
//! keyboard thread ──┐
//! HID thread ───────┼──► mpsc::UnboundedSender<TerminalEvent>
//! transport cbs ────┘                 │
//!                                     ▼
//!                  Terminal::run ── select! { event, tick }
//!                                     │
//!                    ┌────────────────┼───────────────┐
//!                    ▼                ▼               ▼
//!               BootSequence      Navigator      DisplaySurface
//!                                 │       │
//!                           Transport   BackingStore
//! ```
//!
//! Everything after the queue runs on one task, so no locks guard the
//! navigator.

// Rust guideline compliant 2026-02

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::boot::BootSequence;
use crate::config::TerminalConfig;
use crate::constants::{BANNER_DURATION, CURSOR_BLINK_INTERVAL, TICK_INTERVAL};
use crate::display::DisplaySurface;
use crate::input::InputEvent;
use crate::menu::MenuTree;
use crate::navigator::{Handled, Mode, Navigator};
use crate::store::BackingStore;
use crate::transport::{Transport, UpdateCallback};

/// Something for the terminal to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// User input.
    Input(InputEvent),
    /// A watched topic received a value.
    Condition {
        /// Topic.
        topic: String,
        /// New value.
        value: String,
    },
    /// Periodic timer.
    Tick,
}

/// Sender half of the terminal's event queue.
pub type EventSender = mpsc::UnboundedSender<TerminalEvent>;

/// Receiver half of the terminal's event queue.
pub type EventReceiver = mpsc::UnboundedReceiver<TerminalEvent>;

/// Create the terminal's event queue.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// What is on screen.
#[derive(Debug)]
enum Phase {
    Booting {
        boot: BootSequence,
        /// Lines in the last drawn boot frame.
        shown: usize,
    },
    Menu,
}

/// The terminal and its collaborators.
pub struct Terminal<T, S, D> {
    navigator: Navigator,
    phase: Phase,
    transport: T,
    store: S,
    display: D,
    cursor_blink: bool,
    cursor_visible: bool,
    last_blink: Instant,
    /// Generation and show time of the banner being timed.
    banner_timer: Option<(u64, Instant)>,
}

impl<T, S, D> std::fmt::Debug for Terminal<T, S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("phase", &self.phase)
            .field("mode", &self.navigator.state().mode.name())
            .field("path", &self.navigator.state().path)
            .field("cursor_visible", &self.cursor_visible)
            .finish_non_exhaustive()
    }
}

impl<T, S, D> Terminal<T, S, D>
where
    T: Transport,
    S: BackingStore,
    D: DisplaySurface,
{
    /// Create a terminal. Boots at `now` when the config asks for it.
    pub fn new(
        tree: Arc<MenuTree>,
        config: &TerminalConfig,
        transport: T,
        store: S,
        display: D,
        now: Instant,
    ) -> Self {
        let phase = if config.boot_sequence {
            let boot = BootSequence::new(now);
            let shown = boot.revealed(now);
            Phase::Booting { boot, shown }
        } else {
            Phase::Menu
        };
        Self {
            navigator: Navigator::new(tree),
            phase,
            transport,
            store,
            display,
            cursor_blink: config.cursor_blink,
            cursor_visible: true,
            last_blink: now,
            banner_timer: None,
        }
    }

    /// Subscribe every watched topic and draw the first frame.
    ///
    /// Each subscription pushes updates onto `events`. A failed
    /// subscription is logged and the topic simply never updates.
    pub fn start(&mut self, events: &EventSender, now: Instant) {
        let topics = self.navigator.tree().watched_topics().to_vec();
        for topic in topics {
            let tx = events.clone();
            let cb_topic = topic.clone();
            let on_update: UpdateCallback = Box::new(move |value| {
                let event = TerminalEvent::Condition {
                    topic: cb_topic.clone(),
                    value,
                };
                if tx.send(event).is_err() {
                    log::debug!("Dropped update for {cb_topic}: terminal stopped");
                }
            });
            if let Err(e) = self.transport.subscribe(&topic, on_update) {
                log::warn!("Failed to subscribe to {topic}: {e}");
            }
        }
        log::info!(
            "Terminal started ({} watched topics, {})",
            self.navigator.tree().watched_topics().len(),
            if self.is_booting() { "booting" } else { "menu" }
        );
        self.redraw(now);
    }

    /// Process one event. Returns `true` when a frame was drawn.
    pub fn handle(&mut self, event: TerminalEvent, now: Instant) -> bool {
        let redraw = match event {
            TerminalEvent::Input(input) => self.handle_input(input, now),
            TerminalEvent::Condition { topic, value } => {
                let relevant = self.navigator.apply_condition(&topic, &value);
                relevant && !self.is_booting()
            }
            TerminalEvent::Tick => self.handle_tick(now),
        };
        if redraw {
            self.redraw(now);
        }
        redraw
    }

    /// Drain the event queue until it closes or `shutdown` is set.
    pub async fn run(&mut self, mut events: EventReceiver, shutdown: Arc<AtomicBool>) {
        let mut tick = tokio::time::interval(TICK_INTERVAL);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        log::info!("Terminal event loop starting");
        while !shutdown.load(Ordering::SeqCst) {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle(event, Instant::now());
                    }
                    None => {
                        log::info!("Event queue closed");
                        break;
                    }
                },
                _ = tick.tick() => {
                    self.handle(TerminalEvent::Tick, Instant::now());
                }
            }
        }
        log::info!("Terminal event loop stopped");
    }

    fn handle_input(&mut self, input: InputEvent, now: Instant) -> bool {
        if self.is_booting() {
            log::debug!("Boot skipped by {input:?}");
            self.phase = Phase::Menu;
            self.restart_blink(now);
            return true;
        }

        let handled = self
            .navigator
            .handle_input(input, &mut self.transport, &mut self.store);
        if handled == Handled::Ignored {
            return false;
        }
        self.restart_blink(now);
        self.track_banner(now);
        true
    }

    fn handle_tick(&mut self, now: Instant) -> bool {
        let mut redraw = false;

        if let Phase::Booting { boot, shown } = &mut self.phase {
            if boot.is_finished(now) {
                log::debug!("Boot sequence finished");
                self.phase = Phase::Menu;
                self.restart_blink(now);
                return true;
            }
            let revealed = boot.revealed(now);
            if revealed != *shown {
                *shown = revealed;
                redraw = true;
            }
        }

        if let Some((_, shown)) = self.banner_timer {
            if now.saturating_duration_since(shown) >= BANNER_DURATION {
                self.banner_timer = None;
                redraw |= self.navigator.clear_banner();
            }
        }

        if self.cursor_blink
            && self.cursor_on_screen(now)
            && now.saturating_duration_since(self.last_blink) >= CURSOR_BLINK_INTERVAL
        {
            self.cursor_visible = !self.cursor_visible;
            self.last_blink = now;
            redraw = true;
        }

        redraw
    }

    /// Start timing a banner shown since the last check.
    fn track_banner(&mut self, now: Instant) {
        let generation = self.navigator.banner_generation();
        if self.navigator.banner().is_none() {
            self.banner_timer = None;
        } else if self.banner_timer.is_none_or(|(timed, _)| timed != generation) {
            self.banner_timer = Some((generation, now));
        }
    }

    fn restart_blink(&mut self, now: Instant) {
        self.cursor_visible = true;
        self.last_blink = now;
    }

    fn cursor_on_screen(&self, now: Instant) -> bool {
        match &self.phase {
            Phase::Booting { boot, .. } => boot.is_waiting(now),
            Phase::Menu => matches!(self.navigator.state().mode, Mode::Editing(_)),
        }
    }

    fn redraw(&mut self, now: Instant) {
        let visible = self.cursor_visible || !self.cursor_blink;
        let mut screen = match &self.phase {
            Phase::Booting { boot, .. } => boot.screen(now, visible),
            Phase::Menu => self.navigator.screen(),
        };
        if screen.cursor.is_some() {
            screen.cursor_visible = visible;
        }
        self.display.render(&screen);
    }

    /// True while the boot banner is up.
    pub fn is_booting(&self) -> bool {
        matches!(self.phase, Phase::Booting { .. })
    }

    /// The navigator.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable backing store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The display surface.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Whether the cursor is in its visible blink phase.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::MenuItemConfig;
    use crate::constants::{BOOT_MESSAGES, ROOT_TITLE};
    use crate::display::RecordingSurface;
    use crate::store::MemoryStore;
    use crate::transport::LoopbackTransport;

    type TestTerminal = Terminal<LoopbackTransport, MemoryStore, RecordingSurface>;

    fn terminal(
        items: Vec<MenuItemConfig>,
        boot: bool,
        blink: bool,
        now: Instant,
    ) -> TestTerminal {
        let config = TerminalConfig {
            boot_sequence: boot,
            cursor_blink: blink,
            menu_items: items,
            ..TerminalConfig::default()
        };
        let tree = MenuTree::build(&config.menu_items, &config.mqtt_topic_prefix).unwrap();
        Terminal::new(
            Arc::new(tree),
            &config,
            LoopbackTransport::new(),
            MemoryStore::new(),
            RecordingSurface::new(),
            now,
        )
    }

    fn menu() -> Vec<MenuItemConfig> {
        vec![
            MenuItemConfig::new("Door", "status").topic("door"),
            MenuItemConfig::new("Vent", "action").topic("vent").payload("on"),
            MenuItemConfig::new("Notes", "text_editor").file("/notes.txt"),
        ]
    }

    fn drain(term: &mut TestTerminal, rx: &mut EventReceiver, now: Instant) {
        while let Ok(event) = rx.try_recv() {
            term.handle(event, now);
        }
    }

    #[test]
    fn test_start_subscribes_and_draws() {
        let t0 = Instant::now();
        let mut term = terminal(menu(), false, true, t0);
        let (tx, mut rx) = event_channel();

        term.start(&tx, t0);
        assert_eq!(term.display().frame_count(), 1);
        assert!(term.display().last().unwrap().contains(ROOT_TITLE));

        // Transport values arrive through the queue
        term.transport_mut().inject("door", "SEALED");
        drain(&mut term, &mut rx, t0);
        assert!(term.display().last().unwrap().contains("Door: SEALED"));
    }

    #[test]
    fn test_boot_reveals_then_opens_menu() {
        let t0 = Instant::now();
        let mut term = terminal(menu(), true, true, t0);
        let (tx, _rx) = event_channel();
        term.start(&tx, t0);
        assert!(term.is_booting());
        assert_eq!(term.display().last().unwrap().texts(), vec![BOOT_MESSAGES[0]]);

        assert!(term.handle(TerminalEvent::Tick, t0 + Duration::from_millis(200)));
        assert_eq!(term.display().last().unwrap().lines.len(), 2);

        let done = t0 + BootSequence::new(t0).duration();
        term.handle(TerminalEvent::Tick, done);
        assert!(!term.is_booting());
        assert!(term.display().last().unwrap().contains(ROOT_TITLE));
    }

    #[test]
    fn test_key_skips_boot_and_is_consumed() {
        let t0 = Instant::now();
        let mut term = terminal(menu(), true, true, t0);
        let (tx, _rx) = event_channel();
        term.start(&tx, t0);

        assert!(term.handle(TerminalEvent::Input(InputEvent::Down), t0));
        assert!(!term.is_booting());
        assert_eq!(term.navigator().state().selected, Some(0), "Down consumed by skip");
    }

    #[test]
    fn test_conditions_during_boot_update_table() {
        let t0 = Instant::now();
        let mut term = terminal(menu(), true, true, t0);
        let event = TerminalEvent::Condition {
            topic: "door".to_string(),
            value: "OPEN".to_string(),
        };
        assert!(!term.handle(event, t0), "no menu redraw while booting");
        assert_eq!(term.navigator().conditions().get("door"), Some("OPEN"));
    }

    #[test]
    fn test_banner_expires() {
        let t0 = Instant::now();
        let mut term = terminal(menu(), false, false, t0);
        let (tx, _rx) = event_channel();
        term.start(&tx, t0);

        term.handle(TerminalEvent::Input(InputEvent::Down), t0);
        term.handle(TerminalEvent::Input(InputEvent::Enter), t0);
        assert!(term.navigator().banner().is_some());

        assert!(!term.handle(TerminalEvent::Tick, t0 + Duration::from_secs(1)));
        assert!(term.handle(TerminalEvent::Tick, t0 + BANNER_DURATION));
        assert!(term.navigator().banner().is_none());
    }

    #[test]
    fn test_cursor_blinks_only_in_editor() {
        let t0 = Instant::now();
        let mut term = terminal(menu(), false, true, t0);
        let (tx, _rx) = event_channel();
        term.start(&tx, t0);

        // Browsing has no cursor: ticks do nothing
        assert!(!term.handle(TerminalEvent::Tick, t0 + CURSOR_BLINK_INTERVAL));

        let t1 = t0 + Duration::from_secs(1);
        term.handle(TerminalEvent::Input(InputEvent::Down), t1);
        term.handle(TerminalEvent::Input(InputEvent::Down), t1);
        term.handle(TerminalEvent::Input(InputEvent::Enter), t1);
        assert!(term.cursor_visible());

        assert!(term.handle(TerminalEvent::Tick, t1 + CURSOR_BLINK_INTERVAL));
        assert!(!term.cursor_visible());
        assert!(!term.display().last().unwrap().cursor_visible);

        // Typing shows the cursor again
        term.handle(TerminalEvent::Input(InputEvent::Char('x')), t1 + CURSOR_BLINK_INTERVAL);
        assert!(term.cursor_visible());
    }

    #[test]
    fn test_steady_cursor_when_blink_disabled() {
        let t0 = Instant::now();
        let mut term = terminal(menu(), false, false, t0);
        let (tx, _rx) = event_channel();
        term.start(&tx, t0);
        term.handle(TerminalEvent::Input(InputEvent::Down), t0);
        term.handle(TerminalEvent::Input(InputEvent::Down), t0);
        term.handle(TerminalEvent::Input(InputEvent::Enter), t0);

        assert!(!term.handle(TerminalEvent::Tick, t0 + CURSOR_BLINK_INTERVAL * 3));
        assert!(term.display().last().unwrap().cursor_visible);
    }

    #[tokio::test]
    async fn test_run_stops_when_queue_closes() {
        let t0 = Instant::now();
        // No watched topics, so no subscription keeps a sender alive
        let vent = MenuItemConfig::new("Vent", "action").topic("vent").payload("on");
        let mut term = terminal(vec![vent], false, true, t0);
        let (tx, rx) = event_channel();
        term.start(&tx, t0);

        tx.send(TerminalEvent::Input(InputEvent::Enter)).unwrap();
        drop(tx);

        term.run(rx, Arc::new(AtomicBool::new(false))).await;
        assert_eq!(
            term.transport().published(),
            [("vent".to_string(), "on".to_string())]
        );
    }
}
