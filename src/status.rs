//! Receiver status codes and the one place that decides how each is worded and colored.
//!
//! The display, the status page and the serial log all classify through [`classify`], so the
//! three views never disagree about what a status is called.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Coarse synchronization state reported by the receiver.
///
/// Built from the receiver's raw integer code. Codes outside `0..=3` are kept verbatim in
/// [`ReceiverStatus::Unknown`] so two different unknown codes still count as a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiverStatus {
    Disconnected,
    NoSignal,
    Synchronizing,
    Synced,
    Unknown(i32),
}

impl From<i32> for ReceiverStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Disconnected,
            1 => Self::NoSignal,
            2 => Self::Synchronizing,
            3 => Self::Synced,
            other => Self::Unknown(other),
        }
    }
}

impl ReceiverStatus {
    /// The raw code, as the receiver reported it.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Disconnected => 0,
            Self::NoSignal => 1,
            Self::Synchronizing => 2,
            Self::Synced => 3,
            Self::Unknown(code) => code,
        }
    }

    #[must_use]
    pub const fn classification(self) -> Classification {
        match self {
            Self::Disconnected => Classification {
                label: "Disconnected",
                description: "Receiver disconnected",
                severity: Severity::Fault,
            },
            Self::NoSignal => Classification {
                label: "No signal",
                description: "No signal",
                severity: Severity::Warning,
            },
            Self::Synchronizing => Classification {
                label: "Syncing",
                description: "Signal detected, not yet synced",
                severity: Severity::Pending,
            },
            Self::Synced => Classification {
                label: "OK",
                description: "Signal synced",
                severity: Severity::Good,
            },
            Self::Unknown(_) => UNKNOWN,
        }
    }
}

const UNKNOWN: Classification = Classification {
    label: "Unknown",
    description: "Unknown status",
    severity: Severity::Unknown,
};

/// How worrying a status is. Each severity owns exactly one color and one CSS class.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    Fault,
    Warning,
    Pending,
    Good,
    Unknown,
}

impl Severity {
    #[must_use]
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Fault => Rgb565::RED,
            Self::Warning => Rgb565::new(31, 40, 0), // orange
            Self::Pending => Rgb565::YELLOW,
            Self::Good => Rgb565::GREEN,
            Self::Unknown => Rgb565::new(16, 32, 16), // grey
        }
    }

    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Fault => "fault",
            Self::Warning => "warning",
            Self::Pending => "pending",
            Self::Good => "good",
            Self::Unknown => "unknown",
        }
    }
}

/// Wording and severity for one status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Classification {
    /// Short label for the display banner and the status page.
    pub label: &'static str,
    /// Longer sentence for the serial log.
    pub description: &'static str,
    pub severity: Severity,
}

/// Classify a raw receiver code. Total: every code outside `0..=3` is "Unknown".
#[must_use]
pub fn classify(code: i32) -> Classification {
    ReceiverStatus::from(code).classification()
}
