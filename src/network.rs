//! What the rest of the firmware needs to know about the network link.

use core::net::{Ipv4Addr, Ipv6Addr};

use crate::Result;

/// Link state as seen by the status page.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NetworkInfo {
    pub connected: bool,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
}

impl NetworkInfo {
    #[must_use]
    pub const fn offline() -> Self {
        Self {
            connected: false,
            ipv4: None,
            ipv6: None,
        }
    }
}

impl Default for NetworkInfo {
    fn default() -> Self {
        Self::offline()
    }
}

/// The network collaborator of the control loop.
pub trait NetworkManager {
    /// Current link state. Must not block.
    fn info(&self) -> NetworkInfo;

    /// Erase stored Wi-Fi credentials so the next boot does not rejoin.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential storage cannot be written.
    fn forget_credentials(&mut self) -> Result<()>;
}
