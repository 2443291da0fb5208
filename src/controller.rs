//! The control loop body.
//!
//! [`Controller::pass`] is called on a short fixed cadence. The button and the request service
//! are handled on every pass; receiver sampling, logging and redraws only when the tick gate
//! opens. Nothing in a pass waits.

use embassy_time::Instant;

use crate::Result;
use crate::button::{ButtonEvent, HoldMonitor};
use crate::config::{HOLD_THRESHOLD, TICK_PERIOD};
use crate::display::DisplaySurface;
use crate::http::RequestService;
use crate::network::NetworkManager;
use crate::receiver::TimeReceiver;
use crate::render::RenderProjector;
use crate::status::ReceiverStatus;
use crate::status_page::StatusView;
use crate::tick_gate::TickGate;
use crate::tracker::TrackerState;

/// What the caller should do after a pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flow {
    Continue,
    /// Credentials were wiped; reset the device.
    Restart,
}

/// Owns all loop state and the four collaborators.
pub struct Controller<R, D, N, S> {
    receiver: R,
    display: D,
    network: N,
    requests: S,
    tracker: TrackerState,
    button: HoldMonitor,
    gate: TickGate,
    projector: RenderProjector,
}

impl<R, D, N, S> Controller<R, D, N, S>
where
    R: TimeReceiver,
    D: DisplaySurface,
    N: NetworkManager,
    S: RequestService,
{
    #[must_use]
    pub const fn new(receiver: R, display: D, network: N, requests: S) -> Self {
        Self {
            receiver,
            display,
            network,
            requests,
            tracker: TrackerState::new(),
            button: HoldMonitor::new(HOLD_THRESHOLD),
            gate: TickGate::new(TICK_PERIOD),
            projector: RenderProjector::new(),
        }
    }

    /// Draw the static screen furniture. Call once before the first pass.
    ///
    /// # Errors
    ///
    /// Propagates any draw error from the display.
    pub fn start(&mut self) -> Result<()> {
        #[cfg(feature = "defmt")]
        defmt::info!("DCF77 clock starting");
        self.projector.draw_chrome(&mut self.display)
    }

    /// Run one pass of the loop.
    pub fn pass(&mut self, now: Instant, button_pressed: bool) -> Flow {
        match self.button.sample(button_pressed, now) {
            ButtonEvent::Fired => return self.factory_reset(),
            ButtonEvent::Tap => {
                #[cfg(feature = "defmt")]
                defmt::info!("Button released before hold threshold; ignoring");
            }
            ButtonEvent::Pressed => {
                #[cfg(feature = "defmt")]
                defmt::info!("Button down; hold to forget WiFi credentials");
            }
            ButtonEvent::None => {}
        }

        let view = StatusView::new(self.tracker.snapshot(), self.network.info());
        self.requests.service(&view);

        if self.gate.try_open(now) {
            self.tick();
        }
        Flow::Continue
    }

    fn tick(&mut self) {
        let time_delta = self.tracker.observe_time(self.receiver.take_time());
        if let Some(_time) = self.tracker.last_time().filter(|_| time_delta.changed) {
            #[cfg(feature = "defmt")]
            defmt::info!(
                "DCF time: {=u8:02}-{=u8:02}-{=u8:02} {=u8:02}:{=u8:02} (dow={=u8})",
                _time.year,
                _time.month,
                _time.day,
                _time.hour,
                _time.minute,
                _time.day_of_week
            );
        }

        let status = ReceiverStatus::from(self.receiver.status());
        let status_delta = self.tracker.observe_status(status);
        if status_delta.changed {
            #[cfg(feature = "defmt")]
            defmt::info!(
                "[DCF77] {=u16:05} Status: {=str}",
                self.tracker.uptime_ticks(),
                status.classification().description
            );
        }

        let rendered = self
            .projector
            .on_status(&mut self.display, status_delta)
            .and(
                self.projector
                    .on_time(&mut self.display, time_delta, &self.tracker),
            );
        if let Err(_err) = rendered {
            #[cfg(feature = "defmt")]
            defmt::warn!("Display update failed: {}", defmt::Debug2Format(&_err));
        }

        self.tracker.advance_uptime();
    }

    fn factory_reset(&mut self) -> Flow {
        #[cfg(feature = "defmt")]
        defmt::warn!("Button held; forgetting WiFi credentials and restarting");
        if let Err(_err) = self.network.forget_credentials() {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "Failed to forget WiFi credentials: {}",
                defmt::Debug2Format(&_err)
            );
        }
        Flow::Restart
    }

    #[must_use]
    pub const fn tracker(&self) -> &TrackerState {
        &self.tracker
    }

    #[must_use]
    pub const fn receiver(&self) -> &R {
        &self.receiver
    }

    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    #[must_use]
    pub const fn network(&self) -> &N {
        &self.network
    }

    #[must_use]
    pub const fn requests(&self) -> &S {
        &self.requests
    }
}
