//! DCF77 radio clock with an ST7789 display and a status page.
//!
//! Runs on a Raspberry Pi Pico W (or Pico 2 W). Hold the button on GPIO15 for a second to
//! forget the stored WiFi credentials and restart.

#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use dcf_clock::button::Button;
use dcf_clock::config::{DEFAULT_WIFI_PASS, DEFAULT_WIFI_SSID, POLL_INTERVAL, RESTART_DELAY};
use dcf_clock::credential_store::{CredentialStore, INTERNAL_FLASH_SIZE};
use dcf_clock::display::panel::{init_panel, spi_config};
use dcf_clock::http::http_server_task;
use dcf_clock::wifi::{Wifi, WifiNotifier};
use dcf_clock::{Controller, Flow, GraphicsSurface, ReceiverMailbox, Result, StatusBoard};
use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::Spi;
use embassy_time::{Instant, Ticker, Timer};
use panic_probe as _;
use static_cell::StaticCell;

/// Where the external DCF77 decoder drops its frames and status codes.
static RECEIVER: ReceiverMailbox = ReceiverMailbox::new();
static STATUS_BOARD: StatusBoard = StatusBoard::new();
static WIFI_NOTIFIER: WifiNotifier = Wifi::notifier();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    // If it returns, something went wrong.
    let err = inner_main(spawner).await.unwrap_err();
    core::panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    info!("Starting DCF77 clock");
    let p = embassy_rp::init(Default::default());

    // Backlight stays on for the life of the firmware.
    let _backlight = Output::new(p.PIN_20, Level::High);

    static PANEL_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config());
    let panel = init_panel(
        spi,
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_16, Level::Low),
        PANEL_BUFFER.init([0; 512]),
    )?;
    let surface = GraphicsSurface::new(panel);

    let button = Button::new(p.PIN_15);

    let flash = Flash::<_, Blocking, INTERNAL_FLASH_SIZE>::new_blocking(p.FLASH);
    let mut store = CredentialStore::new(flash);
    let credentials = store.load_or_seed(DEFAULT_WIFI_SSID, DEFAULT_WIFI_PASS)?;

    let (wifi, stack) = Wifi::start(
        &WIFI_NOTIFIER,
        p.PIN_23,
        p.PIN_25,
        p.PIO0,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
        store,
        credentials,
        spawner,
    )
    .await?;
    spawner.spawn(http_server_task(stack, &STATUS_BOARD)?);

    let mut controller = Controller::new(&RECEIVER, surface, wifi, &STATUS_BOARD);
    controller.start()?;

    let mut ticker = Ticker::every(POLL_INTERVAL);
    loop {
        if controller.pass(Instant::now(), button.is_pressed()) == Flow::Restart {
            warn!("Restarting");
            Timer::after(RESTART_DELAY).await;
            cortex_m::peripheral::SCB::sys_reset();
        }
        ticker.next().await;
    }
}
