//! A tiny read-only HTTP server for the status views.
//!
//! Only the request line is looked at. Every response closes the connection.

use core::fmt::Write;

use heapless::String;

use crate::Result;
use crate::status_page::{HtmlBuffer, JsonBuffer, StatusView, render_html, render_json};

/// Called by the control loop once per pass with the latest view.
pub trait RequestService {
    fn service(&mut self, view: &StatusView);
}

pub type HeadBuffer = String<160>;

/// A response body.
#[derive(Debug)]
pub enum Body {
    Html(HtmlBuffer),
    Json(JsonBuffer),
    Text(&'static str),
}

impl Body {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Html(page) => page.as_str(),
            Self::Json(document) => document.as_str(),
            Self::Text(text) => text,
        }
    }
}

#[derive(Debug)]
pub struct Response {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: Body,
}

impl Response {
    const fn text(status: &'static str, text: &'static str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: Body::Text(text),
        }
    }

    #[must_use]
    pub const fn not_found() -> Self {
        Self::text("404 Not Found", "Not found")
    }

    /// Write the status line and headers, ending with the blank line.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Format`] if the head outgrows `head`.
    pub fn write_head(&self, head: &mut HeadBuffer) -> Result<()> {
        head.clear();
        write!(
            head,
            "HTTP/1.1 {}\r\n\
             Content-Type: {}; charset=utf-8\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n",
            self.status,
            self.content_type,
            self.body.as_str().len()
        )?;
        Ok(())
    }
}

pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    pub content_type: &'static str,
    pub handler: fn(&StatusView) -> Result<Body>,
}

/// Every path the server answers. Anything else is a 404.
pub const ROUTES: &[Route] = &[
    Route {
        method: "GET",
        path: "/",
        content_type: "text/html",
        handler: html_page,
    },
    Route {
        method: "GET",
        path: "/api/status",
        content_type: "application/json",
        handler: json_status,
    },
];

fn html_page(view: &StatusView) -> Result<Body> {
    let mut page = HtmlBuffer::new();
    render_html(view, &mut page)?;
    Ok(Body::Html(page))
}

fn json_status(view: &StatusView) -> Result<Body> {
    let mut document = JsonBuffer::new();
    render_json(view, &mut document)?;
    Ok(Body::Json(document))
}

/// Split `GET /path?query HTTP/1.1` into method and path. The query is dropped.
#[must_use]
pub fn parse_request_line(request: &str) -> Option<(&str, &str)> {
    let request_line = request.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    let path = target.split_once('?').map_or(target, |(path, _)| path);
    Some((method, path))
}

/// Look up the route and build its response.
#[must_use]
pub fn respond(method: &str, path: &str, view: &StatusView) -> Response {
    let Some(route) = ROUTES
        .iter()
        .find(|route| route.method == method && route.path == path)
    else {
        return Response::not_found();
    };

    match (route.handler)(view) {
        Ok(body) => Response {
            status: "200 OK",
            content_type: route.content_type,
            body,
        },
        Err(_err) => {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "HTTP handler for {} failed: {}",
                path,
                defmt::Debug2Format(&_err)
            );
            Response::text("500 Internal Server Error", "Internal error")
        }
    }
}

#[cfg(all(feature = "device", feature = "wifi"))]
pub use server::http_server_task;

#[cfg(all(feature = "device", feature = "wifi"))]
mod server {
    use defmt::{Debug2Format, info, warn};
    use embassy_net::Stack;
    use embassy_net::tcp::TcpSocket;
    use embassy_time::Timer;
    use embedded_io_async::Write as _;

    use super::{HeadBuffer, parse_request_line, respond};
    use crate::config::{HTTP_PORT, HTTP_SOCKET_TIMEOUT};
    use crate::status_board::StatusBoard;

    const REQUEST_BUFFER_LEN: usize = 1024;

    /// Serve the status views, one connection at a time.
    #[embassy_executor::task]
    pub async fn http_server_task(stack: Stack<'static>, board: &'static StatusBoard) -> ! {
        let mut rx_buffer = [0_u8; 1024];
        let mut tx_buffer = [0_u8; 2048];
        let mut request = [0_u8; REQUEST_BUFFER_LEN];
        let mut head = HeadBuffer::new();

        info!("HTTP status server starting on port {}", HTTP_PORT);

        loop {
            stack.wait_config_up().await;

            let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
            socket.set_timeout(Some(HTTP_SOCKET_TIMEOUT));

            if let Err(err) = socket.accept(HTTP_PORT).await {
                warn!("HTTP accept error: {:?}", err);
                Timer::after_millis(500).await;
                continue;
            }

            let request_len = match socket.read(&mut request).await {
                Ok(0) => {
                    socket.close();
                    continue;
                }
                Ok(n) => n,
                Err(err) => {
                    warn!("HTTP read error: {:?}", err);
                    socket.abort();
                    continue;
                }
            };

            let request_text = request
                .get(..request_len)
                .and_then(|bytes| core::str::from_utf8(bytes).ok())
                .unwrap_or("");
            let (method, path) = parse_request_line(request_text).unwrap_or(("", ""));
            let response = respond(method, path, &board.snapshot());

            let written = match response.write_head(&mut head) {
                Ok(()) => match socket.write_all(head.as_bytes()).await {
                    Ok(()) => socket.write_all(response.body.as_str().as_bytes()).await,
                    Err(err) => Err(err),
                },
                Err(err) => {
                    warn!("HTTP head error: {}", Debug2Format(&err));
                    Ok(())
                }
            };
            if let Err(err) = written {
                warn!("HTTP write error: {:?}", err);
            }

            let _ = socket.flush().await;
            socket.close();
            Timer::after_millis(50).await;
        }
    }
}
