use embassy_time::{Duration, Instant};

/// Lets the expensive part of the loop run at most once per `period`.
///
/// When the gate opens it restarts the period from `now`, not from the previous deadline, so a
/// late pass never triggers catch-up ticks. The schedule may drift; it never bursts.
#[derive(Clone, Copy, Debug)]
pub struct TickGate {
    period: Duration,
    last_tick: Option<Instant>,
}

impl TickGate {
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            last_tick: None,
        }
    }

    /// Returns `true` if the gated work should run on this pass. The first call always opens.
    pub fn try_open(&mut self, now: Instant) -> bool {
        let due = self
            .last_tick
            .is_none_or(|last| now.saturating_duration_since(last) >= self.period);
        if due {
            self.last_tick = Some(now);
        }
        due
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}
