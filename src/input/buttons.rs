//! Debounced navigation buttons.
//!
//! The panel is fed raw pin levels and reports one event per press edge.
//! A press arriving within [`BUTTON_DEBOUNCE`] of the previous accepted
//! press of the same button is treated as contact bounce and dropped.

use std::time::{Duration, Instant};

use super::InputEvent;
use crate::constants::BUTTON_DEBOUNCE;

/// A physical navigation button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Up.
    Up,
    /// Down.
    Down,
    /// Enter / select.
    Enter,
    /// Back.
    Back,
}

impl Button {
    const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Enter, Self::Back];

    fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Enter => 2,
            Self::Back => 3,
        }
    }

    /// Event produced by a press.
    pub fn event(self) -> InputEvent {
        match self {
            Self::Up => InputEvent::Up,
            Self::Down => InputEvent::Down,
            Self::Enter => InputEvent::Enter,
            Self::Back => InputEvent::Back,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ButtonState {
    pressed: bool,
    last_accepted: Option<Instant>,
}

/// Edge detector and debouncer for the four buttons.
#[derive(Debug, Clone)]
pub struct ButtonPanel {
    active_high: bool,
    debounce: Duration,
    states: [ButtonState; 4],
}

impl ButtonPanel {
    /// Create a panel. `active_high` tells which pin level means pressed.
    pub fn new(active_high: bool) -> Self {
        Self::with_debounce(active_high, BUTTON_DEBOUNCE)
    }

    /// Create a panel with a custom debounce window.
    pub fn with_debounce(active_high: bool, debounce: Duration) -> Self {
        Self {
            active_high,
            debounce,
            states: [ButtonState::default(); 4],
        }
    }

    /// Feed the current pin level of `button`.
    ///
    /// Returns the button's event on a released-to-pressed edge that is
    /// outside the debounce window.
    pub fn sample(&mut self, button: Button, level: bool, now: Instant) -> Option<InputEvent> {
        let pressed = level == self.active_high;
        let debounce = self.debounce;
        let state = &mut self.states[button.index()];

        let was_pressed = std::mem::replace(&mut state.pressed, pressed);
        if !pressed || was_pressed {
            return None;
        }

        let bounced = state
            .last_accepted
            .is_some_and(|last| now.saturating_duration_since(last) < debounce);
        if bounced {
            log::trace!("Dropped bounce on {button:?}");
            return None;
        }

        state.last_accepted = Some(now);
        Some(button.event())
    }

    /// Sample all four buttons at once, in `Up, Down, Enter, Back` order.
    pub fn sample_all(&mut self, levels: [bool; 4], now: Instant) -> Vec<InputEvent> {
        Button::ALL
            .into_iter()
            .zip(levels)
            .filter_map(|(button, level)| self.sample(button, level, now))
            .collect()
    }
}
