//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed responses keyed by request target (path plus query). Unknown
//! targets get 404. A route can be marked truncated: it advertises the full
//! Content-Length but closes the connection after half the body.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub truncate: bool,
}

impl Route {
    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.as_bytes().to_vec(),
            truncate: false,
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/zip",
            body,
            truncate: false,
        }
    }

    pub fn truncated(body: Vec<u8>) -> Self {
        Self {
            truncate: true,
            ..Self::bytes(body)
        }
    }
}

#[derive(Debug, Default)]
pub struct Routes(HashMap<String, Route>);

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, target: &str, route: Route) -> Self {
        self.0.insert(target.to_string(), route);
        self
    }
}

/// Starts the server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Routes) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &Routes) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }

    let Some(route) = routes.0.get(target) else {
        let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    };

    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        reason,
        route.content_type,
        route.body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let sent = if route.truncate {
        &route.body[..route.body.len() / 2]
    } else {
        &route.body[..]
    };
    let _ = stream.write_all(sent);
    let _ = stream.flush();
}
