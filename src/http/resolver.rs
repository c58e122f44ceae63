//! DNS override resolver
//!
//! Lets a scan target a staging server by IP while still sending the real
//! host name (Host header and TLS SNI stay untouched). Hosts without an
//! override go through the system resolver.

use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct OverrideResolver {
    overrides: HashMap<String, IpAddr>,
}

impl OverrideResolver {
    pub fn new(overrides: HashMap<String, IpAddr>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(host, ip)| (host.to_ascii_lowercase(), ip))
            .collect();
        Self { overrides }
    }

    /// Override address for a `host:port` pair, if one is configured
    pub fn lookup(&self, netloc: &str) -> Option<SocketAddr> {
        let (host, port) = split_netloc(netloc)?;
        self.overrides
            .get(&host.to_ascii_lowercase())
            .map(|ip| SocketAddr::new(*ip, port))
    }
}

impl ureq::Resolver for OverrideResolver {
    fn resolve(&self, netloc: &str) -> io::Result<Vec<SocketAddr>> {
        if let Some(addr) = self.lookup(netloc) {
            debug!("Resolved {} to {} via override", netloc, addr);
            return Ok(vec![addr]);
        }
        netloc.to_socket_addrs().map(|addrs| addrs.collect())
    }
}

/// Split `host:port` (or `[v6]:port`) into its parts
fn split_netloc(netloc: &str) -> Option<(&str, u16)> {
    let (host, port) = netloc.rsplit_once(':')?;
    let port = port.parse().ok()?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    Some((host, port))
}
