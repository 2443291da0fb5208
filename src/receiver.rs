//! The receiver collaborator: where decoded frames and status codes come from.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::decoded_time::DecodedTime;

/// Source of decoded time and coarse sync status.
///
/// Both calls must return immediately. "Nothing new" is `None`, not an error.
pub trait TimeReceiver {
    /// The next decoded frame, if one arrived since the last call.
    fn take_time(&mut self) -> Option<DecodedTime>;

    /// The receiver's current raw status code (see [`crate::status::ReceiverStatus`]).
    fn status(&mut self) -> i32;
}

#[derive(Clone, Copy)]
struct Slot {
    time: Option<DecodedTime>,
    status: i32,
}

/// A static drop box between a decoder task and the control loop.
///
/// The decoder publishes whenever it has something; the loop takes each frame at most once.
/// Until the decoder reports anything the status reads as disconnected (0).
///
/// ```rust,ignore
/// static RECEIVER: ReceiverMailbox = ReceiverMailbox::new();
///
/// // decoder side
/// RECEIVER.publish_status(2);
/// RECEIVER.publish_time(frame);
///
/// // control loop side
/// let mut receiver = &RECEIVER;
/// let frame = receiver.take_time();
/// ```
pub struct ReceiverMailbox {
    slot: Mutex<CriticalSectionRawMutex, Cell<Slot>>,
}

impl ReceiverMailbox {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot {
                time: None,
                status: 0,
            })),
        }
    }

    /// Replace any frame not yet taken.
    pub fn publish_time(&self, time: DecodedTime) {
        self.slot.lock(|cell| {
            let mut slot = cell.get();
            slot.time = Some(time);
            cell.set(slot);
        });
    }

    pub fn publish_status(&self, status: i32) {
        self.slot.lock(|cell| {
            let mut slot = cell.get();
            slot.status = status;
            cell.set(slot);
        });
    }
}

impl Default for ReceiverMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeReceiver for &ReceiverMailbox {
    fn take_time(&mut self) -> Option<DecodedTime> {
        self.slot.lock(|cell| {
            let mut slot = cell.get();
            let time = slot.time.take();
            cell.set(slot);
            time
        })
    }

    fn status(&mut self) -> i32 {
        self.slot.lock(|cell| cell.get().status)
    }
}
