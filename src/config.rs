//! Compile-time configuration for the clock.
//!
//! Timing and layout are constants. Network defaults come from `build.rs`, which reads
//! `WIFI_SSID`, `WIFI_PASS` and `CLOCK_HOSTNAME` from the environment or a `.env` file.

use embassy_time::Duration;

use crate::display::Region;

/// Period of the gated work: receiver sampling, logging and redraws.
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// How long the reset button must stay down before the credentials are wiped.
pub const HOLD_THRESHOLD: Duration = Duration::from_millis(1000);

/// Cadence of the outer loop. Button sampling and request servicing run this often.
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// The uptime counter is cosmetic and starts over after this many ticks.
pub const UPTIME_WRAP: u16 = 32_000;

pub const HTTP_PORT: u16 = 80;
pub const HTTP_SOCKET_TIMEOUT: Duration = Duration::from_secs(10);
pub const STATUS_PAGE_REFRESH_SECS: u8 = 10;

pub const WIFI_JOIN_RETRY: Duration = Duration::from_secs(5);

/// Pause between wiping the credentials and resetting, so the log line gets out.
pub const RESTART_DELAY: Duration = Duration::from_millis(500);

pub const DEFAULT_WIFI_SSID: &str = env!("WIFI_SSID");
pub const DEFAULT_WIFI_PASS: &str = env!("WIFI_PASS");
pub const HOSTNAME: &str = env!("CLOCK_HOSTNAME");

// ── Display geometry (ST7789 panel rotated to 320x240 landscape) ────────
pub const SCREEN: Region = Region::new(0, 0, 320, 240);
pub const TITLE_ORIGIN: (i32, i32) = (8, 6);
pub const STATUS_LABEL_ORIGIN: (i32, i32) = (8, 40);
pub const STATUS_BANNER: Region = Region::new(96, 34, 224, 30);
pub const CLOCK_BLOCK: Region = Region::new(0, 84, 320, 60);
pub const DATE_BLOCK: Region = Region::new(0, 156, 320, 48);
