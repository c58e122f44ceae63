//! HTTP fetching for page audits
//!
//! The audit core only ever sees a fetched [`Response`]. This module owns
//! everything needed to produce one:
//! - `Fetcher` - blocking client (ureq) with timeout, redirect policy,
//!   default headers and DNS overrides
//! - `FetchCache` - URL-keyed memoisation for secondary lookups
//!   (status codes, remote sizes) shared across concurrent runs
//!
//! Primary page fetches are never cached. Retries are not attempted here
//! or anywhere in the pipeline.

mod cache;
mod client;
mod resolver;

pub use cache::FetchCache;
pub use client::Fetcher;
pub use resolver::OverrideResolver;

use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while fetching a page
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Options applied to every request a [`Fetcher`] makes
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout (connect + read)
    pub timeout: Duration,
    /// Whether 3xx responses are followed
    pub follow_redirects: bool,
    /// Maximum redirects followed when `follow_redirects` is set
    pub max_redirects: u32,
    pub user_agent: String,
    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Host name -> IP address overrides, bypassing DNS
    pub dns_overrides: HashMap<String, IpAddr>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            follow_redirects: true,
            max_redirects: 10,
            user_agent: format!("seo-audit/{}", env!("CARGO_PKG_VERSION")),
            headers: BTreeMap::new(),
            dns_overrides: HashMap::new(),
        }
    }
}

/// A fetched HTTP response. Immutable once built.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status, or 0 when no status was ever received
    pub status: u16,
    /// Effective URL after redirects
    pub url: String,
    pub body: String,
    /// Time until response headers arrived
    pub elapsed: Duration,
    /// Lowercased header names with their values, in arrival order
    headers: Vec<(String, String)>,
}

impl Response {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
            elapsed: Duration::ZERO,
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// First value of a header, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A link is broken when its status is 4xx, 5xx or was never received
pub fn is_broken_status(status: u16) -> bool {
    status == 0 || (400..600).contains(&status)
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Minimal HTTP/1.1 server on a random local port for fetch tests

    use std::collections::HashMap;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub struct Route {
        pub status: u16,
        pub headers: Vec<(&'static str, String)>,
        pub body: String,
    }

    impl Route {
        pub fn ok(body: &str) -> Self {
            Self {
                status: 200,
                headers: vec![("Content-Type", "text/html".to_string())],
                body: body.to_string(),
            }
        }

        pub fn status(status: u16) -> Self {
            Self {
                status,
                headers: Vec::new(),
                body: String::new(),
            }
        }

        pub fn redirect(location: &str) -> Self {
            Self {
                status: 301,
                headers: vec![("Location", location.to_string())],
                body: String::new(),
            }
        }
    }

    pub struct TestServer {
        pub port: u16,
        pub hits: Arc<AtomicUsize>,
    }

    impl TestServer {
        pub fn url(&self, path: &str) -> String {
            format!("http://127.0.0.1:{}{}", self.port, path)
        }
    }

    /// Serve `routes` by path until the test process exits. Unknown paths 404.
    pub fn serve(routes: HashMap<&'static str, Route>) -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let port = listener.local_addr().expect("local addr").port();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                counter.fetch_add(1, Ordering::SeqCst);

                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line) {
                        Ok(0) => break,
                        Ok(_) if line == "\r\n" || line == "\n" => break,
                        Ok(_) => {}
                        Err(_) => break,
                    }
                }

                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or("GET").to_string();
                let path = parts.next().unwrap_or("/").to_string();

                let fallback = Route::status(404);
                let route = routes.get(path.as_str()).unwrap_or(&fallback);
                let mut head = format!("HTTP/1.1 {} Test\r\n", route.status);
                for (name, value) in &route.headers {
                    head.push_str(&format!("{}: {}\r\n", name, value));
                }
                head.push_str(&format!("Content-Length: {}\r\n", route.body.len()));
                head.push_str("Connection: close\r\n\r\n");

                let _ = stream.write_all(head.as_bytes());
                if method != "HEAD" {
                    let _ = stream.write_all(route.body.as_bytes());
                }
                let _ = stream.flush();
            }
        });

        TestServer { port, hits }
    }
}
