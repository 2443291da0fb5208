//! Hands the control loop's latest [`StatusView`] to the HTTP task.
//!
//! The loop is the only writer. Readers get a copy, so a request never holds the lock while it
//! renders and never observes a half-updated view.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::http::RequestService;
use crate::network::NetworkInfo;
use crate::status_page::StatusView;
use crate::tracker::TrackerState;

pub struct StatusBoard {
    view: Mutex<CriticalSectionRawMutex, Cell<StatusView>>,
}

impl StatusBoard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            view: Mutex::new(Cell::new(StatusView::new(
                TrackerState::new(),
                NetworkInfo::offline(),
            ))),
        }
    }

    pub fn publish(&self, view: StatusView) {
        self.view.lock(|cell| cell.set(view));
    }

    #[must_use]
    pub fn snapshot(&self) -> StatusView {
        self.view.lock(Cell::get)
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestService for &StatusBoard {
    fn service(&mut self, view: &StatusView) {
        self.publish(*view);
    }
}
