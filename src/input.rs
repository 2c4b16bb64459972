//! Debounced button capture.
//!
//! Runs inside the GPIO interrupt handler. It owns the per-pin pressed
//! state and only ever talks to the rest of the game through the packets
//! it produces.

use embassy_time::Instant;

use crate::{
    config::DEBOUNCE_US,
    event::Direction,
};

/// The two game buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum Pin {
    Left,
    Right,
}

impl Pin {
    const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// Direction emitted while this button is held.
    pub const fn direction(self) -> Direction {
        match self {
            Self::Left => Direction::Left,
            Self::Right => Direction::Right,
        }
    }
}

/// Which transition the pin interrupt should wait for next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arm {
    Press,
    Release,
}

/// Result of an accepted transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub direction: Direction,
    pub arm: Arm,
}

#[derive(Clone, Copy, Default)]
struct PinState {
    pressed: bool,
    last_accepted: Option<Instant>,
}

/// Press/release tracking for both pins.
#[derive(Default)]
pub struct DebounceTracker {
    pins: [PinState; 2],
}

impl DebounceTracker {
    pub const fn new() -> Self {
        Self {
            pins: [PinState {
                pressed: false,
                last_accepted: None,
            }; 2],
        }
    }

    /// Feed one interrupt from `pin` observed at `now`.
    ///
    /// Returns `None` when the edge lands inside the debounce window; the
    /// tracked state is left untouched in that case.
    pub fn on_interrupt(&mut self, pin: Pin, now: Instant) -> Option<Transition> {
        let state = &mut self.pins[pin.index()];

        if let Some(last) = state.last_accepted {
            let since = now.saturating_duration_since(last).as_micros();
            if since < DEBOUNCE_US {
                return None;
            }
        }

        state.pressed = !state.pressed;
        state.last_accepted = Some(now);

        Some(if state.pressed {
            Transition {
                direction: pin.direction(),
                arm: Arm::Release,
            }
        } else {
            Transition {
                direction: Direction::None,
                arm: Arm::Press,
            }
        })
    }

    #[cfg(test)]
    fn is_pressed(&self, pin: Pin) -> bool {
        self.pins[pin.index()].pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_then_release_emits_direction_then_none() {
        let mut tracker = DebounceTracker::new();

        let press = tracker.on_interrupt(Pin::Right, Instant::from_micros(10_000));
        assert_eq!(
            press,
            Some(Transition {
                direction: Direction::Right,
                arm: Arm::Release
            })
        );
        assert!(tracker.is_pressed(Pin::Right));

        let release = tracker.on_interrupt(Pin::Right, Instant::from_micros(60_000));
        assert_eq!(
            release,
            Some(Transition {
                direction: Direction::None,
                arm: Arm::Press
            })
        );
        assert!(!tracker.is_pressed(Pin::Right));
    }

    #[test]
    fn bounce_inside_window_is_ignored() {
        let mut tracker = DebounceTracker::new();
        assert!(tracker.on_interrupt(Pin::Left, Instant::from_micros(1_000)).is_some());

        assert_eq!(tracker.on_interrupt(Pin::Left, Instant::from_micros(1_200)), None);
        assert!(tracker.is_pressed(Pin::Left));

        // The window is measured from the last accepted edge, not the bounce.
        let release = tracker.on_interrupt(Pin::Left, Instant::from_micros(1_000 + DEBOUNCE_US));
        assert_eq!(release.map(|t| t.direction), Some(Direction::None));
    }

    #[test]
    fn pins_debounce_independently() {
        let mut tracker = DebounceTracker::new();
        assert!(tracker.on_interrupt(Pin::Left, Instant::from_micros(5_000)).is_some());

        let right = tracker.on_interrupt(Pin::Right, Instant::from_micros(5_100));
        assert_eq!(right.map(|t| t.direction), Some(Direction::Right));
        assert!(tracker.is_pressed(Pin::Left));
    }
}
