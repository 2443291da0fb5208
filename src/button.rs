//! The reset button: a non-blocking hold detector plus the GPIO it samples.
//!
//! The loop samples the pin once per pass and hands the level to [`HoldMonitor::sample`]. Nothing
//! here waits, so the display and the status page keep running while the button is held.

use embassy_time::{Duration, Instant};

/// What one sample of the button meant.
//
// Rather than describing a press with a couple of `bool`s, each outcome gets its own variant.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    #[default]
    None,
    /// A press just started; timing begins now.
    Pressed,
    /// Released before the threshold. Short presses are ignored.
    Tap,
    /// Held for the full threshold. Reported once per hold.
    Fired,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum HoldState {
    Idle,
    Pressed { since: Instant },
    // Waiting for the release that follows a fired hold.
    Fired,
}

/// Detects a button held down for at least `threshold`.
///
/// Timing starts only on an observed released-to-pressed edge. A button that is already down at
/// the first sample (stuck low since power-on) must be released and pressed again.
#[derive(Clone, Copy, Debug)]
pub struct HoldMonitor {
    threshold: Duration,
    state: HoldState,
    last_level: Option<bool>,
}

impl HoldMonitor {
    #[must_use]
    pub const fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            state: HoldState::Idle,
            last_level: None,
        }
    }

    /// Feed one sample. `pressed` is the logical level (already inverted for active-low wiring).
    pub fn sample(&mut self, pressed: bool, now: Instant) -> ButtonEvent {
        let previous = self.last_level.replace(pressed);
        match (self.state, pressed) {
            (HoldState::Idle, true) if previous == Some(false) => {
                self.state = HoldState::Pressed { since: now };
                ButtonEvent::Pressed
            }
            (HoldState::Pressed { since }, true) => {
                if now.saturating_duration_since(since) >= self.threshold {
                    self.state = HoldState::Fired;
                    ButtonEvent::Fired
                } else {
                    ButtonEvent::None
                }
            }
            (HoldState::Pressed { .. }, false) => {
                self.state = HoldState::Idle;
                ButtonEvent::Tap
            }
            (HoldState::Fired, false) => {
                self.state = HoldState::Idle;
                ButtonEvent::None
            }
            (HoldState::Idle | HoldState::Fired, _) => ButtonEvent::None,
        }
    }

    /// `true` while a press is being timed.
    #[must_use]
    pub const fn is_timing(&self) -> bool {
        matches!(self.state, HoldState::Pressed { .. })
    }
}

#[cfg(feature = "device")]
pub use hardware::Button;

#[cfg(feature = "device")]
mod hardware {
    use embassy_rp::Peri;
    use embassy_rp::gpio::{Input, Pin, Pull};

    /// A push button wired from the pin to ground, with the internal pull-up enabled.
    pub struct Button<'d> {
        input: Input<'d>,
    }

    impl<'d> Button<'d> {
        #[must_use]
        pub fn new(pin: Peri<'d, impl Pin>) -> Self {
            Self {
                input: Input::new(pin, Pull::Up),
            }
        }

        /// Active-low: the pin reads low while the button is down.
        #[must_use]
        pub fn is_pressed(&self) -> bool {
            self.input.is_low()
        }
    }
}
