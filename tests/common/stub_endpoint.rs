//! Minimal HTTP stub for wire-level lookup tests.
//!
//! Serves one canned response to every request on an ephemeral local port
//! and records request heads so tests can assert on the query string.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Request heads (request line plus headers) seen by the stub, in order.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// Spawn a stub endpoint answering every request with `status` and `body`.
///
/// Returns the base URL and the request log. The accept loop runs until the
/// test process exits; each test spawns its own stub on its own port.
pub async fn spawn_stub_endpoint(status: u16, body: &str) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let body = body.to_string();

    let task_log = Arc::clone(&log);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            let log = Arc::clone(&task_log);
            tokio::spawn(async move {
                let mut buffer = [0u8; 4096];
                let mut read = 0usize;
                while read < buffer.len() {
                    match socket.read(&mut buffer[read..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            read += n;
                            if buffer[..read].windows(4).any(|window| window == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                log.lock()
                    .push(String::from_utf8_lossy(&buffer[..read]).to_string());

                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    503 => "Service Unavailable",
                    _ => "Unknown",
                };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), log)
}
