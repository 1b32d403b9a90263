//! Mock Luna backend for testing
//!
//! A tiny blocking HTTP server that answers the same routes as the real
//! backend so `HttpBackend` can be tested without a network:
//! - GET /status, /trend, /predictions, /logs, /logs/pdf
//! - POST /profile, /first-period, /logger, /assistant
//! - PUT /update-period, /profile

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Token the mock accepts; anything else gets a 401
pub const MOCK_TOKEN: &str = "mock_token";

/// Mock Luna server
pub struct MockBackendServer {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Reject every token
    pub fail_auth: bool,
    /// Path answered with a 500
    pub fail_path: Option<String>,
    /// No symptom logs stored (PDF export answers 404)
    pub empty_logs: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

impl MockBackendServer {
    /// Start on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        thread::spawn(move || handle_connection(stream, &cfg));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBackendServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read headers, then as much body as Content-Length announces
fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let _ = stream.set_nonblocking(false);
    let mut data = Vec::new();
    let mut buffer = [0; 4096];

    loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(split) = text.find("\r\n\r\n") {
            let head = &text[..split];
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= split + 4 + content_length {
                let body = String::from_utf8_lossy(&data[split + 4..]).to_string();
                return Some((head.to_string(), body));
            }
        }
    }

    let text = String::from_utf8_lossy(&data).to_string();
    Some((text, String::new()))
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig) {
    let Some((head, body)) = read_request(&mut stream) else {
        return;
    };

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let first_line = head.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", r#"{"error": "Invalid request"}"#);
        return;
    }

    let method = parts[0];
    let path = parts[1].split('?').next().unwrap_or(parts[1]);
    let route = path.strip_prefix("/api").unwrap_or(path);

    if config.fail_path.as_deref() == Some(route) {
        send_response(
            &mut stream,
            500,
            "Internal Server Error",
            r#"{"error": "database unavailable"}"#,
        );
        return;
    }

    // Creating a profile is the only unauthenticated route
    let is_signup = method == "POST" && route == "/profile";
    let head_lower = head.to_lowercase();
    let has_valid_token = head_lower.contains(&format!("x-user-token: {}", MOCK_TOKEN));
    if !is_signup && (config.fail_auth || !has_valid_token) {
        send_response(&mut stream, 401, "Unauthorized", r#"{"error": "Invalid token"}"#);
        return;
    }

    match (method, route) {
        ("GET", "/status") => send_response(
            &mut stream,
            200,
            "OK",
            r#"{"phase": "follicular", "day_in_cycle": 12}"#,
        ),
        ("GET", "/trend") => send_response(
            &mut stream,
            200,
            "OK",
            r#"{"message": "Cramps are common for you now.", "common_symptoms": ["Cramps"]}"#,
        ),
        ("GET", "/predictions") => send_response(
            &mut stream,
            200,
            "OK",
            r#"[
                {"period_number": 1, "estimated_start": "2025-03-01", "estimated_end": "2025-03-05"},
                {"period_number": 2, "estimnated_start": "2025-03-29"},
                {"period_number": 3, "estimated_start": "2025-04-26", "estimated_end": ""}
            ]"#,
        ),
        ("GET", "/logs") => {
            let logs = if config.empty_logs {
                "[]"
            } else {
                r#"[
                    {"id": 1, "symptomname": "Cramps", "severity": 2, "created_at": "2025-02-10T08:00:00Z"},
                    {"id": 2, "symptomname": "Headache", "severity": "1", "created_at": "2025-02-11"}
                ]"#
            };
            send_response(&mut stream, 200, "OK", logs);
        }
        ("GET", "/logs/pdf") => {
            if config.empty_logs {
                send_response(&mut stream, 404, "Not Found", r#"{"error": "No logs"}"#);
            } else {
                send_raw(&mut stream, 200, "OK", "application/pdf", b"%PDF-1.4 mock");
            }
        }
        ("POST", "/profile") => send_response(
            &mut stream,
            201,
            "Created",
            &format!(r#"{{"token": "{}"}}"#, MOCK_TOKEN),
        ),
        ("PUT", "/profile") => {
            let length = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("avgcyclelength").and_then(|n| n.as_u64()));
            match length {
                Some(21..=45) => send_response(&mut stream, 200, "OK", r#"{"ok": true}"#),
                _ => send_response(
                    &mut stream,
                    400,
                    "Bad Request",
                    r#"{"error": "avgcyclelength out of range"}"#,
                ),
            }
        }
        ("POST", "/first-period") | ("POST", "/logger") => {
            send_response(&mut stream, 201, "Created", r#"{"ok": true}"#)
        }
        ("PUT", "/update-period") => {
            send_response(&mut stream, 200, "OK", r#"{"message": "Cycle updated."}"#)
        }
        ("POST", "/assistant") => {
            send_response(&mut stream, 200, "OK", r#"{"reply": "Stay hydrated."}"#)
        }
        _ => send_response(
            &mut stream,
            404,
            "Not Found",
            r#"{"error": "Endpoint not found"}"#,
        ),
    }
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    send_raw(stream, status, status_text, "application/json", body.as_bytes());
}

fn send_raw(stream: &mut TcpStream, status: u16, status_text: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        status_text,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
