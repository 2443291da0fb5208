//! The two read-only views served over HTTP: an HTML page for people and a JSON document for
//! scripts. Both are rebuilt from a [`StatusView`] on every request.

use core::fmt::Write;

use heapless::String;

use crate::Result;
use crate::config::{STATUS_PAGE_REFRESH_SECS, TICK_PERIOD};
use crate::network::NetworkInfo;
use crate::tracker::TrackerState;

pub type HtmlBuffer = String<2048>;
pub type JsonBuffer = String<384>;

/// Everything the status page shows, copied out of the control loop.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatusView {
    pub tracker: TrackerState,
    pub network: NetworkInfo,
}

impl StatusView {
    #[must_use]
    pub const fn new(tracker: TrackerState, network: NetworkInfo) -> Self {
        Self { tracker, network }
    }

    /// Gated ticks converted to seconds.
    #[must_use]
    pub const fn uptime_seconds(&self) -> u64 {
        (self.tracker.uptime_ticks() as u64).saturating_mul(TICK_PERIOD.as_secs())
    }
}

/// Writes an address, or nothing when it is unknown.
struct MaybeAddr<T>(Option<T>);

impl<T: core::fmt::Display> core::fmt::Display for MaybeAddr<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.0 {
            Some(addr) => write!(f, "{addr}"),
            None => Ok(()),
        }
    }
}

/// Render the human-readable status page.
///
/// # Errors
///
/// Returns [`crate::Error::Format`] if the page outgrows `page`.
pub fn render_html(view: &StatusView, page: &mut HtmlBuffer) -> Result<()> {
    let network = &view.network;
    let classification = view.tracker.status().classification();

    page.clear();
    write!(
        page,
        "<!DOCTYPE html>\
         <html>\
         <head>\
             <meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
             <meta http-equiv=\"refresh\" content=\"{STATUS_PAGE_REFRESH_SECS}\">\
             <title>DCF77 Clock</title>\
             <link rel=\"icon\" href=\"data:,\">\
             <style>\
                 body {{ font-family: sans-serif; margin: 2em; background: #111; color: #eee; }}\
                 td {{ padding: 0.2em 1em 0.2em 0; }}\
                 .fault {{ color: #f44; }}\
                 .warning {{ color: #f80; }}\
                 .pending {{ color: #fd0; }}\
                 .good {{ color: #4d4; }}\
                 .unknown {{ color: #888; }}\
             </style>\
         </head>\
         <body>\
             <h1>DCF77 Clock</h1>\
             <table>"
    )?;

    write!(
        page,
        "<tr><td>WiFi</td><td>{}</td></tr>\
         <tr><td>IPv4</td><td>{}</td></tr>\
         <tr><td>IPv6</td><td>{}</td></tr>\
         <tr><td>DCF77</td><td class=\"{}\">{}</td></tr>",
        if network.connected {
            "Connected"
        } else {
            "Not connected"
        },
        MaybeAddr(network.ipv4),
        MaybeAddr(network.ipv6),
        classification.severity.css_class(),
        classification.label,
    )?;

    page.push_str("<tr><td>Last time</td><td>")
        .map_err(|()| crate::Error::Format)?;
    match view.tracker.last_time() {
        Some(time) => write!(
            page,
            "{} {} {}",
            time.weekday_name(),
            time.calendar_date(),
            time.hours_minutes()
        )?,
        None => page.push_str("Not synced yet").map_err(|()| crate::Error::Format)?,
    }

    write!(
        page,
        "</td></tr>\
         <tr><td>Uptime</td><td>{} s</td></tr>\
             </table>\
         </body>\
         </html>",
        view.uptime_seconds()
    )?;
    Ok(())
}

/// Render the machine-readable status document.
///
/// Unknown addresses are empty strings. `time.year` is the two-digit year as received and
/// `time.dow` the raw day-of-week, even when it is out of range.
///
/// # Errors
///
/// Returns [`crate::Error::Format`] if the document outgrows `body`.
pub fn render_json(view: &StatusView, body: &mut JsonBuffer) -> Result<()> {
    let network = &view.network;
    let status = view.tracker.status();

    body.clear();
    write!(
        body,
        "{{\"wifi_connected\":{},\"ipv4\":\"{}\",\"ipv6\":\"{}\"",
        network.connected,
        MaybeAddr(network.ipv4),
        MaybeAddr(network.ipv6),
    )?;
    write!(
        body,
        ",\"dcf_status\":{},\"dcf_status_text\":\"{}\"",
        status.code(),
        status.classification().label,
    )?;
    write!(
        body,
        ",\"uptime_seconds\":{},\"has_time\":{}",
        view.uptime_seconds(),
        view.tracker.has_time(),
    )?;
    if let Some(time) = view.tracker.last_time() {
        write!(
            body,
            ",\"time\":{{\"year\":{},\"month\":{},\"day\":{},\"hour\":{},\"minute\":{},\"dow\":{}}}",
            time.year, time.month, time.day, time.hour, time.minute, time.day_of_week,
        )?;
    }
    body.push('}').map_err(|_| crate::Error::Format)?;
    Ok(())
}
