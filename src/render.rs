//! Projects tracker deltas onto the display.
//!
//! Each region is repainted only when its delta says it changed. Nothing about the previous
//! frame is remembered here: the deltas carry all the edge information.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::Result;
use crate::config::{CLOCK_BLOCK, DATE_BLOCK, SCREEN, STATUS_BANNER, STATUS_LABEL_ORIGIN, TITLE_ORIGIN};
use crate::display::DisplaySurface;
use crate::tracker::{StatusDelta, TimeDelta, TrackerState};

const BACKGROUND: Rgb565 = Rgb565::BLACK;
const FOREGROUND: Rgb565 = Rgb565::WHITE;
const DIM: Rgb565 = Rgb565::new(20, 40, 20);

const TEXT_MARGIN: i32 = 8;

#[derive(Clone, Copy, Debug, Default)]
pub struct RenderProjector;

impl RenderProjector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Clear the screen and draw the labels that never change.
    ///
    /// # Errors
    ///
    /// Propagates any draw error from the surface.
    pub fn draw_chrome<S: DisplaySurface>(&self, surface: &mut S) -> Result<()> {
        surface.fill_rect(SCREEN, BACKGROUND)?;

        surface.set_text_size(2);
        surface.set_text_color(FOREGROUND, BACKGROUND);
        surface.set_cursor(TITLE_ORIGIN.0, TITLE_ORIGIN.1);
        surface.print("DCF77 Clock")?;

        surface.set_text_color(DIM, BACKGROUND);
        surface.set_cursor(STATUS_LABEL_ORIGIN.0, STATUS_LABEL_ORIGIN.1);
        surface.print("Status:")
    }

    /// Repaint the status banner after a status transition.
    ///
    /// # Errors
    ///
    /// Propagates any draw error from the surface.
    pub fn on_status<S: DisplaySurface>(&self, surface: &mut S, delta: StatusDelta) -> Result<()> {
        if !delta.changed {
            return Ok(());
        }
        let classification = delta.current.classification();

        surface.fill_rect(STATUS_BANNER, BACKGROUND)?;
        surface.set_text_size(2);
        surface.set_text_color(classification.severity.color(), BACKGROUND);
        surface.set_cursor(STATUS_BANNER.x + TEXT_MARGIN, STATUS_BANNER.y + 6);
        surface.print(classification.label)
    }

    /// Repaint the clock and date blocks after a new time reading.
    ///
    /// # Errors
    ///
    /// Propagates any draw error from the surface.
    pub fn on_time<S: DisplaySurface>(
        &self,
        surface: &mut S,
        delta: TimeDelta,
        tracker: &TrackerState,
    ) -> Result<()> {
        let Some(time) = tracker.last_time().filter(|_| delta.changed) else {
            return Ok(());
        };

        surface.fill_rect(CLOCK_BLOCK, BACKGROUND)?;
        surface.set_text_size(3);
        surface.set_text_color(FOREGROUND, BACKGROUND);
        surface.set_cursor(CLOCK_BLOCK.x + TEXT_MARGIN, CLOCK_BLOCK.y + 14);
        surface.print_fmt(format_args!("{}", time.hours_minutes()))?;

        surface.fill_rect(DATE_BLOCK, BACKGROUND)?;
        surface.set_text_size(2);
        surface.set_cursor(DATE_BLOCK.x + TEXT_MARGIN, DATE_BLOCK.y + 4);
        surface.print_fmt(format_args!("{}", time.weekday_name()))?;
        surface.set_cursor(DATE_BLOCK.x + TEXT_MARGIN, DATE_BLOCK.y + 26);
        surface.print_fmt(format_args!("{}", time.calendar_date()))
    }
}
