//! Minimal HTTP/1.1 status server.
//!
//! One request per connection, answered and closed. Requests are served
//! sequentially on the server thread; a request read times out so a stalled
//! client cannot hold it forever.
//!
//! - `GET /` -> HTML table
//! - `GET /stats.json` -> JSON listing
//! - anything else -> 404

use super::{render, StatusSource};
use crate::error::StatusError;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const READ_TIMEOUT: Duration = Duration::from_secs(5);
/// Cap on request line plus headers
const MAX_HEAD_BYTES: u64 = 8 * 1024;

pub struct StatusServer {
    listener: TcpListener,
    source: StatusSource,
    refresh_secs: u32,
}

struct Response {
    status: &'static str,
    content_type: &'static str,
    body: String,
}

impl StatusServer {
    pub fn bind(addr: &str, source: StatusSource, refresh_secs: u32) -> Result<Self, StatusError> {
        let listener = TcpListener::bind(addr).map_err(|e| StatusError::BindFailed {
            addr: addr.to_string(),
            source: e,
        })?;
        Ok(Self {
            listener,
            source,
            refresh_secs,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Serve on a background thread for the rest of the process
    pub fn spawn(self) -> Result<JoinHandle<()>, StatusError> {
        if let Some(addr) = self.local_addr() {
            tracing::info!("Status page at http://{}/", addr);
        }
        thread::Builder::new()
            .name("status-server".to_string())
            .spawn(move || self.serve())
            .map_err(StatusError::ThreadSpawnFailed)
    }

    fn serve(self) {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = self.handle(stream) {
                        tracing::debug!("Status request failed: {}", e);
                    }
                }
                Err(e) => tracing::warn!("Status server accept failed: {}", e),
            }
        }
    }

    fn handle(&self, mut stream: TcpStream) -> std::io::Result<()> {
        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let request_line = read_head(&stream)?;

        let response = self.respond(&request_line);
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nCache-Control: no-store\r\nConnection: close\r\n\r\n",
            response.status,
            response.content_type,
            response.body.len()
        );
        stream.write_all(head.as_bytes())?;
        stream.write_all(response.body.as_bytes())?;
        stream.flush()
    }

    fn respond(&self, request_line: &str) -> Response {
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or("");
        let path = parts.next().unwrap_or("");
        // Query strings don't select anything here
        let path = path.split('?').next().unwrap_or("");

        match (method, path) {
            ("GET", "/") => Response {
                status: "200 OK",
                content_type: "text/html; charset=utf-8",
                body: render::html(&self.source.view(), self.refresh_secs),
            },
            ("GET", "/stats.json") => match render::json(&self.source.view()) {
                Ok(body) => Response {
                    status: "200 OK",
                    content_type: "application/json",
                    body,
                },
                Err(e) => {
                    tracing::error!("Failed to serialize status: {}", e);
                    Response {
                        status: "500 Internal Server Error",
                        content_type: "text/plain; charset=utf-8",
                        body: "internal error\n".to_string(),
                    }
                }
            },
            _ => Response {
                status: "404 Not Found",
                content_type: "text/plain; charset=utf-8",
                body: "not found\n".to_string(),
            },
        }
    }
}

/// Read the request line and drain the headers, never more than
/// `MAX_HEAD_BYTES` in total. Closing with unread headers would reset the
/// connection before the client sees the response.
fn read_head(stream: impl Read) -> std::io::Result<String> {
    let mut reader = BufReader::new(stream.take(MAX_HEAD_BYTES));
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header)? == 0 || header.trim().is_empty() {
            break;
        }
    }
    Ok(request_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::tracker::CurrentDeck;
    use crate::store::SharedStore;

    fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(stream, "GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path).unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_serves_html_json_and_404() {
        let shared = SharedStore::default();
        shared.update(|s| {
            s.record_win("Dragon Deck");
            s.register("Idle Deck");
        });

        let source = StatusSource::new(shared.reader(), CurrentDeck::default());
        let server = StatusServer::bind("127.0.0.1:0", source, 5).unwrap();
        let addr = server.local_addr().unwrap();
        server.spawn().unwrap();

        let page = get(addr, "/");
        assert!(page.starts_with("HTTP/1.1 200 OK"));
        assert!(page.contains("<td>Dragon Deck</td>"));
        assert!(!page.contains("Idle Deck"));

        // Publisher sees later writes
        shared.update(|s| {
            s.record_loss("Dragon Deck");
        });
        let json = get(addr, "/stats.json?x=1");
        assert!(json.starts_with("HTTP/1.1 200 OK"));
        assert!(json.contains("\"wins\":1,\"losses\":1,\"win_rate\":50"));

        let missing = get(addr, "/nope");
        assert!(missing.starts_with("HTTP/1.1 404 Not Found"));
    }

    #[test]
    fn test_read_head_is_bounded() {
        let head = read_head(std::io::repeat(b'a')).unwrap();
        assert_eq!(head.len() as u64, MAX_HEAD_BYTES);

        let head = read_head(&b"GET / HTTP/1.1\r\nHost: x\r\n\r\nbody"[..]).unwrap();
        assert_eq!(head, "GET / HTTP/1.1\r\n");
    }

    #[test]
    fn test_bind_conflict_is_error() {
        let first = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = first.local_addr().unwrap().to_string();
        let source = StatusSource::new(SharedStore::default().reader(), CurrentDeck::default());

        assert!(matches!(
            StatusServer::bind(&addr, source, 5),
            Err(StatusError::BindFailed { .. })
        ));
    }
}
