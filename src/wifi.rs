//! Wi-Fi client for the Pico W's CYW43 radio.
//!
//! Joins the stored network, keeps rejoining after the link drops, and publishes the link
//! state where the control loop can read it without waiting. There is no access point mode:
//! with no stored credentials the radio is brought up but never joins.
//!
//! ```rust,ignore
//! static WIFI_NOTIFIER: WifiNotifier = Wifi::notifier();
//!
//! let (wifi, stack) = Wifi::start(
//!     &WIFI_NOTIFIER,
//!     p.PIN_23, p.PIN_25, p.PIO0, p.PIN_24, p.PIN_29, p.DMA_CH0,
//!     store,
//!     credentials,
//!     spawner,
//! )
//! .await?;
//! ```

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::cell::Cell;

use cyw43::JoinOptions;
use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_net::{Config, Stack, StackResources};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_rp::{Peri, bind_interrupts};
use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_time::Timer;
use static_cell::StaticCell;

use crate::Result;
use crate::config::{HOSTNAME, WIFI_JOIN_RETRY};
use crate::credential_store::{CredentialStore, WifiCredentials};
use crate::network::{NetworkInfo, NetworkManager};

type LinkState = Mutex<CriticalSectionRawMutex, Cell<NetworkInfo>>;

/// Static resources for [`Wifi`]. Create one with [`Wifi::notifier`].
pub struct WifiNotifier {
    link: LinkState,
    radio_state: StaticCell<cyw43::State>,
    stack_resources: StaticCell<StackResources<4>>,
}

/// The network collaborator on the device.
pub struct Wifi {
    link: &'static LinkState,
    store: CredentialStore,
}

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

impl Wifi {
    #[must_use]
    pub const fn notifier() -> WifiNotifier {
        WifiNotifier {
            link: Mutex::new(Cell::new(NetworkInfo::offline())),
            radio_state: StaticCell::new(),
            stack_resources: StaticCell::new(),
        }
    }

    /// Bring up the radio and network stack and spawn the tasks that run them.
    ///
    /// Returns once the stack exists; joining happens in the background. The returned stack
    /// is for the HTTP server.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TaskSpawn`] if a background task cannot be spawned.
    #[allow(clippy::too_many_arguments, reason = "one argument per radio pin")]
    pub async fn start(
        notifier: &'static WifiNotifier,
        pin_23: Peri<'static, PIN_23>,
        pin_25: Peri<'static, PIN_25>,
        pio0: Peri<'static, PIO0>,
        pin_24: Peri<'static, PIN_24>,
        pin_29: Peri<'static, PIN_29>,
        dma_ch0: Peri<'static, DMA_CH0>,
        store: CredentialStore,
        credentials: Option<WifiCredentials>,
        spawner: Spawner,
    ) -> Result<(Self, Stack<'static>)> {
        let fw = cyw43_firmware::CYW43_43439A0;
        let clm = cyw43_firmware::CYW43_43439A0_CLM;

        let pwr = Output::new(pin_23, Level::Low);
        let cs = Output::new(pin_25, Level::High);
        let mut pio = Pio::new(pio0, Irqs);
        let spi = PioSpi::new(
            &mut pio.common,
            pio.sm0,
            DEFAULT_CLOCK_DIVIDER,
            pio.irq0,
            cs,
            pin_24,
            pin_29,
            dma_ch0,
        );

        let state = notifier.radio_state.init(cyw43::State::new());
        let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
        spawner.spawn(radio_task(runner)?);

        control.init(clm).await;
        control
            .set_power_management(cyw43::PowerManagementMode::PowerSave)
            .await;

        let mut dhcp = embassy_net::DhcpConfig::default();
        dhcp.hostname = HOSTNAME.try_into().ok();
        let seed = 0x7c8f_3a2e_9d14_6b5a;
        let (stack, runner) = embassy_net::new(
            net_device,
            Config::dhcpv4(dhcp),
            notifier.stack_resources.init(StackResources::new()),
            seed,
        );
        spawner.spawn(net_task(runner)?);

        match credentials {
            Some(credentials) => {
                spawner.spawn(link_task(control, stack, credentials, &notifier.link)?);
            }
            None => warn!("No WiFi credentials stored; staying offline"),
        }

        Ok((
            Self {
                link: &notifier.link,
                store,
            },
            stack,
        ))
    }
}

impl NetworkManager for Wifi {
    fn info(&self) -> NetworkInfo {
        self.link.lock(Cell::get)
    }

    fn forget_credentials(&mut self) -> Result<()> {
        self.store.forget()
    }
}

#[embassy_executor::task]
async fn radio_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Join, wait for DHCP, publish the address, then wait for the link to drop and start over.
#[embassy_executor::task]
async fn link_task(
    mut control: cyw43::Control<'static>,
    stack: Stack<'static>,
    credentials: WifiCredentials,
    link: &'static LinkState,
) -> ! {
    let WifiCredentials { ssid, password } = credentials;
    loop {
        info!("Joining WiFi network {}", ssid.as_str());
        if let Err(err) = control
            .join(ssid.as_str(), JoinOptions::new(password.as_bytes()))
            .await
        {
            warn!("WiFi join failed: {}", err.status);
            Timer::after(WIFI_JOIN_RETRY).await;
            continue;
        }

        info!("WiFi joined; waiting for DHCP");
        stack.wait_config_up().await;

        let ipv4 = stack.config_v4().map(|config| config.address.address());
        if let Some(address) = ipv4 {
            info!("IP address: {}", address);
        }
        link.lock(|cell| {
            cell.set(NetworkInfo {
                connected: true,
                ipv4,
                ipv6: None,
            });
        });

        stack.wait_link_down().await;
        warn!("WiFi link lost");
        link.lock(|cell| cell.set(NetworkInfo::offline()));
    }
}
