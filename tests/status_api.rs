//! Host-level tests for the classifier, the status views and the HTTP routing.

use core::net::Ipv4Addr;

use dcf_clock::http::{parse_request_line, respond, HeadBuffer, ROUTES};
use dcf_clock::status_page::{render_html, render_json, HtmlBuffer, JsonBuffer};
use dcf_clock::{
    classify, Controller, DecodedTime, DisplaySurface, NetworkInfo, NetworkManager,
    ReceiverMailbox, Region, Result, Severity, StatusBoard, StatusView, TimeReceiver,
    TrackerState,
};
use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;

struct NullSurface;

impl DisplaySurface for NullSurface {
    fn set_cursor(&mut self, _x: i32, _y: i32) {}
    fn set_text_size(&mut self, _size: u8) {}
    fn set_text_color(&mut self, _foreground: Rgb565, _background: Rgb565) {}
    fn fill_rect(&mut self, _region: Region, _color: Rgb565) -> Result<()> {
        Ok(())
    }
    fn print(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

struct JoinedNetwork;

impl NetworkManager for JoinedNetwork {
    fn info(&self) -> NetworkInfo {
        NetworkInfo {
            connected: true,
            ipv4: Some(Ipv4Addr::new(192, 168, 1, 42)),
            ipv6: None,
        }
    }

    fn forget_credentials(&mut self) -> Result<()> {
        Ok(())
    }
}

const SUNDAY_AFTERNOON: DecodedTime = DecodedTime {
    year: 25,
    month: 6,
    day: 1,
    hour: 14,
    minute: 30,
    day_of_week: 7,
};

fn json(view: &StatusView) -> String {
    let mut body = JsonBuffer::new();
    render_json(view, &mut body).unwrap();
    body.as_str().to_owned()
}

fn html(view: &StatusView) -> String {
    let mut page = HtmlBuffer::new();
    render_html(view, &mut page).unwrap();
    page.as_str().to_owned()
}

// ── Classifier ──────────────────────────────────────────────────────────

#[test]
fn known_codes_have_their_own_labels() {
    assert_eq!(classify(0).label, "Disconnected");
    assert_eq!(classify(1).label, "No signal");
    assert_eq!(classify(2).label, "Syncing");
    assert_eq!(classify(3).label, "OK");
    assert_eq!(classify(3).severity, Severity::Good);
    assert_eq!(classify(0).severity, Severity::Fault);
}

#[test]
fn every_other_code_is_unknown() {
    let unknown = classify(4);
    assert_eq!(unknown.label, "Unknown");
    assert_eq!(unknown.severity, Severity::Unknown);
    for code in [-1, 4, 5, 99, i32::MIN, i32::MAX] {
        assert_eq!(classify(code), unknown, "code {code}");
    }
}

#[test]
fn each_severity_has_a_distinct_color_and_class() {
    let severities = [
        Severity::Fault,
        Severity::Warning,
        Severity::Pending,
        Severity::Good,
        Severity::Unknown,
    ];
    for (i, a) in severities.iter().enumerate() {
        for b in severities.iter().skip(i + 1) {
            assert_ne!(a.color(), b.color());
            assert_ne!(a.css_class(), b.css_class());
        }
    }
}

// ── Views ───────────────────────────────────────────────────────────────

#[test]
fn sync_sequence_reaches_both_views_through_the_board() {
    let receiver = ReceiverMailbox::new();
    let board = StatusBoard::new();
    let mut controller = Controller::new(&receiver, NullSurface, JoinedNetwork, &board);

    for (tick, code) in [0, 1, 2, 3].into_iter().enumerate() {
        receiver.publish_status(code);
        if code == 3 {
            receiver.publish_time(SUNDAY_AFTERNOON);
        }
        controller.pass(Instant::from_millis(tick as u64 * 1000), false);
    }
    // The board is refreshed at the start of each pass.
    controller.pass(Instant::from_millis(3020), false);

    let view = board.snapshot();
    let document = json(&view);
    assert!(document.contains("\"dcf_status\":3"), "{document}");
    assert!(document.contains("\"dcf_status_text\":\"OK\""), "{document}");
    assert!(document.contains("\"has_time\":true"), "{document}");
    assert!(document.contains("\"dow\":7"), "{document}");
    assert!(document.contains("\"wifi_connected\":true"), "{document}");
    assert!(document.contains("\"ipv4\":\"192.168.1.42\""), "{document}");
    assert!(document.contains("\"uptime_seconds\":4"), "{document}");

    let page = html(&view);
    assert!(page.contains("Sunday"));
    assert!(page.contains("14:30"));
    assert!(page.contains("Connected"));
    assert!(page.contains("class=\"good\">OK"));
}

#[test]
fn json_before_any_reading() {
    let view = StatusView::default();
    assert_eq!(
        json(&view),
        "{\"wifi_connected\":false,\"ipv4\":\"\",\"ipv6\":\"\",\"dcf_status\":0,\
         \"dcf_status_text\":\"Disconnected\",\"uptime_seconds\":0,\"has_time\":false}"
    );
}

#[test]
fn json_time_object_uses_raw_values() {
    let mut tracker = TrackerState::new();
    tracker.observe_time(Some(DecodedTime {
        day_of_week: 9,
        ..SUNDAY_AFTERNOON
    }));
    let document = json(&StatusView::new(tracker, NetworkInfo::offline()));
    assert!(document.ends_with(
        ",\"time\":{\"year\":25,\"month\":6,\"day\":1,\"hour\":14,\"minute\":30,\"dow\":9}}"
    ));
}

#[test]
fn html_placeholder_until_synced() {
    let page = html(&StatusView::default());
    assert!(page.contains("Not synced yet"));
    assert!(page.contains("Not connected"));
    assert!(page.contains("http-equiv=\"refresh\""));
}

#[test]
fn html_out_of_range_weekday_is_unknown() {
    let mut tracker = TrackerState::new();
    tracker.observe_time(Some(DecodedTime {
        day_of_week: 0,
        ..SUNDAY_AFTERNOON
    }));
    let page = html(&StatusView::new(tracker, NetworkInfo::offline()));
    assert!(page.contains("Unknown 01.06.2025 14:30"));
}

// ── HTTP ────────────────────────────────────────────────────────────────

#[test]
fn exactly_two_routes_are_served() {
    let paths: Vec<_> = ROUTES.iter().map(|route| (route.method, route.path)).collect();
    assert_eq!(paths, [("GET", "/"), ("GET", "/api/status")]);
}

#[test]
fn request_line_is_split_and_query_dropped() {
    let request = "GET /api/status?pretty=1 HTTP/1.1\r\nHost: clock\r\n\r\n";
    assert_eq!(parse_request_line(request), Some(("GET", "/api/status")));
    assert_eq!(parse_request_line(""), None);
    assert_eq!(parse_request_line("GET"), None);
}

#[test]
fn routes_answer_with_their_content_types() {
    let view = StatusView::default();

    let page = respond("GET", "/", &view);
    assert_eq!(page.status, "200 OK");
    assert_eq!(page.content_type, "text/html");
    assert!(page.body.as_str().starts_with("<!DOCTYPE html>"));

    let status = respond("GET", "/api/status", &view);
    assert_eq!(status.status, "200 OK");
    assert_eq!(status.content_type, "application/json");
    assert!(status.body.as_str().starts_with("{\"wifi_connected\""));
}

#[test]
fn anything_else_is_not_found() {
    let view = StatusView::default();
    for (method, path) in [("GET", "/missing"), ("POST", "/"), ("DELETE", "/api/status")] {
        let response = respond(method, path, &view);
        assert_eq!(response.status, "404 Not Found");
        assert_eq!(response.content_type, "text/plain");
        assert_eq!(response.body.as_str(), "Not found");
    }
}

#[test]
fn response_head_carries_length_and_closes() {
    let response = respond("GET", "/nope", &StatusView::default());
    let mut head = HeadBuffer::new();
    response.write_head(&mut head).unwrap();
    assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(head.contains("Content-Length: 9\r\n"));
    assert!(head.contains("Connection: close\r\n"));
    assert!(head.ends_with("\r\n\r\n"));
}

// ── Handoff ─────────────────────────────────────────────────────────────

#[test]
fn board_starts_offline_and_disconnected() {
    let view = StatusBoard::new().snapshot();
    assert!(!view.network.connected);
    assert!(!view.tracker.has_time());
}

#[test]
fn mailbox_hands_out_each_frame_once() {
    let mailbox = ReceiverMailbox::new();
    let mut receiver = &mailbox;
    assert_eq!(receiver.status(), 0);
    assert_eq!(receiver.take_time(), None);

    mailbox.publish_status(2);
    mailbox.publish_time(SUNDAY_AFTERNOON);
    assert_eq!(receiver.status(), 2);
    assert_eq!(receiver.take_time(), Some(SUNDAY_AFTERNOON));
    assert_eq!(receiver.take_time(), None);
    assert_eq!(receiver.status(), 2);
}
