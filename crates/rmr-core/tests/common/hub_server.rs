//! Minimal HTTP/1.1 server standing in for the catalog hub in tests.
//!
//! Serves a fixed body to every GET. Options allow a non-200 status or a
//! delayed response for cancellation/deadline tests.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct HubServerOptions {
    /// Status line sent to every request.
    pub status: &'static str,
    /// Sleep before writing the response (simulates a slow hub).
    pub delay: Duration,
}

impl Default for HubServerOptions {
    fn default() -> Self {
        Self {
            status: "200 OK",
            delay: Duration::ZERO,
        }
    }
}

/// Starts a server in a background thread serving `body` to every GET.
/// Returns the base URL (e.g. "http://127.0.0.1:12345/"). The server runs
/// until the process exits.
pub fn start(body: impl Into<Vec<u8>>) -> String {
    start_with_options(body, HubServerOptions::default())
}

/// Like `start` but with a custom status or response delay.
pub fn start_with_options(body: impl Into<Vec<u8>>, opts: HubServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body.into());
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, &body, opts));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: HubServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(10)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(10)));

    // Read and discard the request head; every request gets the same answer.
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }

    if !opts.delay.is_zero() {
        thread::sleep(opts.delay);
    }

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        opts.status,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}
