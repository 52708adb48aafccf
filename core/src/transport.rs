//! Executes `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the only seam where I/O happens. `UreqTransport` disables
//! ureq's status-code-as-error behavior so 4xx/5xx responses come back as
//! data and the client decides what they mean. Only failures that produce no
//! response at all (DNS, connect, timeout) surface as `Err`.
//!
//! Response bodies are read in full up to [`MAX_BODY_BYTES`], well past
//! ureq's 10 MB default, so large playlist listings are not cut off. A body
//! over the cap is a transport error, not a truncated decode.

use std::time::Duration;

use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Largest response body `UreqTransport` reads by default (64 MiB).
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Performs one HTTP round trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a shared `ureq::Agent`.
///
/// Every request is bounded by the configured global timeout.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            body_limit: MAX_BODY_BYTES,
        }
    }

    pub fn with_body_limit(mut self, limit: u64) -> Self {
        self.body_limit = limit;
        self
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.path.as_str();
        let body = request.body.as_deref();

        let mut response = match (request.method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), request).call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), request).call(),
            (HttpMethod::Delete, Some(body)) => {
                with_headers(self.agent.delete(url).force_send_body(), request).send(body.as_bytes())
            }
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), request).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), request).send_empty(),
            (HttpMethod::Patch, Some(body)) => with_headers(self.agent.patch(url), request).send(body.as_bytes()),
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), request).send_empty(),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().with_config().limit(self.body_limit).read_to_string()?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::thread;

    use super::*;

    /// Answers a single request with a 200 and `len` bytes of JSON string.
    fn serve_once(len: usize) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 2 {
                line.clear();
            }
            let body = format!("\"{}\"", "a".repeat(len - 2));
            let mut stream = reader.into_inner();
            let _ = write!(
                stream,
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
        });
        addr
    }

    fn get(addr: SocketAddr) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("http://{addr}/playlists"),
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn reads_bodies_past_ureq_default_limit() {
        let len = 12 * 1024 * 1024;
        let transport = UreqTransport::new(Duration::from_secs(10));
        let response = transport.execute(&get(serve_once(len))).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body.len(), len);
    }

    #[test]
    fn body_over_limit_is_transport_error() {
        let transport = UreqTransport::new(Duration::from_secs(2)).with_body_limit(1024);
        assert!(transport.execute(&get(serve_once(4096))).is_err());
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let transport = UreqTransport::new(Duration::from_secs(2));
        let request = HttpRequest {
            method: HttpMethod::Get,
            path: format!("http://{addr}/playlists"),
            headers: Vec::new(),
            body: None,
        };
        assert!(transport.execute(&request).is_err());
    }
}
