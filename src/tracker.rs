//! Last-known receiver state and the edge detection that keeps logging and redraws to one per
//! transition.

use crate::config::UPTIME_WRAP;
use crate::decoded_time::DecodedTime;
use crate::status::ReceiverStatus;

/// Result of [`TrackerState::observe_time`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeDelta {
    /// `true` whenever a reading was present, even if it repeats the previous one.
    pub changed: bool,
}

/// Result of [`TrackerState::observe_status`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusDelta {
    /// `true` only when `current` differs from `previous`.
    pub changed: bool,
    pub previous: Option<ReceiverStatus>,
    pub current: ReceiverStatus,
}

/// The controller's view of the receiver.
///
/// Owned and mutated by the control loop only. It is `Copy` so the loop can hand snapshots
/// to the HTTP task without sharing the original.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TrackerState {
    last_time: Option<DecodedTime>,
    // `None` until the first reading, so that reading always counts as a transition.
    last_status: Option<ReceiverStatus>,
    uptime_ticks: u16,
}

impl TrackerState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_time: None,
            last_status: None,
            uptime_ticks: 0,
        }
    }

    /// Record a time reading, if there is one.
    ///
    /// An absent reading is the normal idle case between frames and leaves the state alone;
    /// once a time is known it is never cleared.
    pub const fn observe_time(&mut self, candidate: Option<DecodedTime>) -> TimeDelta {
        match candidate {
            Some(time) => {
                self.last_time = Some(time);
                TimeDelta { changed: true }
            }
            None => TimeDelta { changed: false },
        }
    }

    /// Record a status reading and report whether it is a transition.
    pub fn observe_status(&mut self, status: ReceiverStatus) -> StatusDelta {
        let previous = self.last_status;
        let changed = previous != Some(status);
        if changed {
            self.last_status = Some(status);
        }
        StatusDelta {
            changed,
            previous,
            current: status,
        }
    }

    /// Count one gated tick and return the new value.
    pub const fn advance_uptime(&mut self) -> u16 {
        self.uptime_ticks = if self.uptime_ticks >= UPTIME_WRAP {
            0
        } else {
            self.uptime_ticks.saturating_add(1)
        };
        self.uptime_ticks
    }

    /// A copy for another task. The copy does not follow later changes.
    #[must_use]
    pub const fn snapshot(&self) -> Self {
        *self
    }

    #[must_use]
    pub const fn last_time(&self) -> Option<DecodedTime> {
        self.last_time
    }

    #[must_use]
    pub const fn has_time(&self) -> bool {
        self.last_time.is_some()
    }

    #[must_use]
    pub const fn last_status(&self) -> Option<ReceiverStatus> {
        self.last_status
    }

    /// The status to show. Before the first reading nothing has been heard from the receiver,
    /// which is reported as disconnected.
    #[must_use]
    pub fn status(&self) -> ReceiverStatus {
        self.last_status.unwrap_or(ReceiverStatus::Disconnected)
    }

    #[must_use]
    pub const fn uptime_ticks(&self) -> u16 {
        self.uptime_ticks
    }
}
