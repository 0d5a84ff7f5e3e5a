//! Minimal HTTP/1.1 server that tracks how many requests are in flight.
//!
//! Serves a single static body with `Connection: close`, so every request is
//! its own connection and the connection count equals the in-flight request
//! count. An optional per-request delay widens the window in which requests
//! overlap, making the high-water mark a reliable concurrency probe.
//! Paths starting with `/missing` return 404.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

pub struct CountingServer {
    base_url: String,
    max_active: Arc<AtomicUsize>,
}

impl CountingServer {
    /// Full URL for `path` (which must start with '/').
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Highest number of requests that were ever in flight simultaneously.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `body`, holding each
/// request open for `delay` before responding. The server runs until the
/// process exits.
pub fn start(body: &'static [u8], delay: Duration) -> CountingServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let active = Arc::new(AtomicUsize::new(0));
    let max_active = Arc::new(AtomicUsize::new(0));
    let max_handle = Arc::clone(&max_active);

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            thread::spawn(move || handle(stream, body, delay, &active, &max_active));
        }
    });

    CountingServer {
        base_url: format!("http://127.0.0.1:{port}/"),
        max_active: max_handle,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    delay: Duration,
    active: &AtomicUsize,
    max_active: &AtomicUsize,
) {
    let now_active = active.fetch_add(1, Ordering::SeqCst) + 1;
    max_active.fetch_max(now_active, Ordering::SeqCst);

    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut buf = [0u8; 8192];
    let request = match stream.read(&mut buf) {
        Ok(n) if n > 0 => String::from_utf8_lossy(&buf[..n]).into_owned(),
        _ => {
            active.fetch_sub(1, Ordering::SeqCst);
            return;
        }
    };

    thread::sleep(delay);

    if request.lines().next().is_some_and(|line| line.contains("/missing")) {
        let _ = stream.write_all(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
    } else {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(body);
    }

    active.fetch_sub(1, Ordering::SeqCst);
}
