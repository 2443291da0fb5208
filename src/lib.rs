//! Shared items for the DCF77 radio clock.
//!
//! Everything outside the `device` feature is plain `no_std` logic that also builds on the
//! host, so the control loop can be tested without a board attached.
#![no_std]

pub mod button;
pub mod config;
pub mod controller;
pub mod credential_store;
pub mod decoded_time;
pub mod display;
mod error;
pub mod http;
pub mod network;
pub mod receiver;
pub mod render;
pub mod status;
pub mod status_board;
pub mod status_page;
pub mod tick_gate;
pub mod tracker;
#[cfg(all(feature = "device", feature = "wifi"))]
pub mod wifi;

// Re-export commonly used items
pub use button::{ButtonEvent, HoldMonitor};
pub use controller::{Controller, Flow};
pub use decoded_time::DecodedTime;
pub use display::{DisplaySurface, GraphicsSurface, Region};
pub use error::{Error, Result};
pub use http::RequestService;
pub use network::{NetworkInfo, NetworkManager};
pub use receiver::{ReceiverMailbox, TimeReceiver};
pub use render::RenderProjector;
pub use status::{Classification, ReceiverStatus, Severity, classify};
pub use status_board::StatusBoard;
pub use status_page::StatusView;
pub use tick_gate::TickGate;
pub use tracker::{StatusDelta, TimeDelta, TrackerState};
