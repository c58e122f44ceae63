//! Blocking HTTP client built on ureq

use super::{is_broken_status, FetchCache, FetchError, FetchOptions, OverrideResolver, Response};
use std::time::Instant;
use tracing::{debug, warn};

/// Fetches pages and answers memoised secondary lookups
pub struct Fetcher {
    agent: ureq::Agent,
    options: FetchOptions,
    cache: FetchCache,
}

fn make_agent(options: &FetchOptions) -> ureq::Agent {
    let redirects = if options.follow_redirects {
        options.max_redirects
    } else {
        0
    };

    ureq::AgentBuilder::new()
        .timeout(options.timeout)
        .redirects(redirects)
        .user_agent(&options.user_agent)
        .resolver(OverrideResolver::new(options.dns_overrides.clone()))
        .build()
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self::with_cache(options, FetchCache::new())
    }

    /// Build a fetcher that shares an existing cache
    pub fn with_cache(options: FetchOptions, cache: FetchCache) -> Self {
        Self {
            agent: make_agent(&options),
            options,
            cache,
        }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Fetch a page with GET.
    ///
    /// HTTP error statuses are returned as an `Ok` response; only transport
    /// failures (DNS, connect, timeout) and unreadable bodies are errors.
    pub fn fetch(&self, url: &str) -> Result<Response, FetchError> {
        self.request("GET", url, true)
    }

    /// Status code of `url`, memoised. Transport failures yield 0.
    pub fn remote_status(&self, url: &str) -> u16 {
        self.cache.status_or_insert_with(url, || {
            match self.request("HEAD", url, false) {
                Ok(response) => response.status,
                Err(e) => {
                    debug!("Status lookup for {} failed: {}", url, e);
                    0
                }
            }
        })
    }

    /// Size in bytes of `url`, memoised.
    ///
    /// Uses the `Content-Length` header when the server sends one, else the
    /// length of the downloaded body. Transport failures yield 0.
    pub fn remote_size(&self, url: &str) -> u64 {
        self.cache.size_or_insert_with(url, || {
            let declared = self
                .request("HEAD", url, false)
                .ok()
                .and_then(|r| r.header("content-length").and_then(|v| v.trim().parse().ok()));
            if let Some(size) = declared {
                return size;
            }
            match self.fetch(url) {
                Ok(response) => response.body.len() as u64,
                Err(e) => {
                    debug!("Size lookup for {} failed: {}", url, e);
                    0
                }
            }
        })
    }

    /// Whether `url` answers with 4xx, 5xx or not at all
    pub fn is_broken_link(&self, url: &str) -> bool {
        is_broken_status(self.remote_status(url))
    }

    fn request(&self, method: &str, url: &str, read_body: bool) -> Result<Response, FetchError> {
        url::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut req = self.agent.request(method, url);
        for (name, value) in &self.options.headers {
            req = req.set(name, value);
        }

        let start = Instant::now();
        let response = match req.call() {
            Ok(response) => response,
            // 4xx/5xx still carry a full response worth inspecting
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                warn!("{} {} failed: {}", method, url, transport);
                return Err(FetchError::Transport {
                    url: url.to_string(),
                    message: transport.to_string(),
                });
            }
        };
        let elapsed = start.elapsed();

        let status = response.status();
        let effective_url = response.get_url().to_string();
        let headers: Vec<(String, String)> = response
            .headers_names()
            .into_iter()
            .filter_map(|name| {
                response
                    .header(&name)
                    .map(|value| (name.clone(), value.to_string()))
            })
            .collect();

        let body = if read_body {
            response.into_string().map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?
        } else {
            String::new()
        };

        debug!("{} {} -> {} in {:?}", method, url, status, elapsed);

        let mut fetched = Response::new(status, effective_url, body).with_elapsed(elapsed);
        for (name, value) in headers {
            fetched = fetched.with_header(&name, value);
        }
        Ok(fetched)
    }
}
