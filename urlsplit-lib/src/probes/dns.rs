//! DNS resolution probe.
//!
//! Looks up the parsed URL's full hostname through the system resolver
//! (`tokio::net::lookup_host`). At least one address means the name is recorded.

use crate::parser::ParsedUrl;
use crate::probes::DEFAULT_PROBE_TIMEOUT;
use std::time::Duration;
use tracing::debug;

/// Resolver wrapper for DNS record checks.
#[derive(Debug, Clone)]
pub struct DnsProbe {
    /// Timeout for a single lookup
    timeout: Duration,
}

impl DnsProbe {
    /// Create a new DNS probe with the default five second timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Create a new DNS probe with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check whether the URL's full hostname has an address record.
    pub async fn is_recorded(&self, url: &ParsedUrl) -> bool {
        self.resolves(url.full_domain()).await
    }

    /// Check whether `host` resolves to at least one address.
    pub async fn resolves(&self, host: &str) -> bool {
        // lookup_host wants a socket address; the port is irrelevant.
        let lookup = tokio::net::lookup_host((host, 0));

        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(mut addrs)) => {
                let found = addrs.next().is_some();
                debug!(host, found, "DNS probe finished");
                found
            }
            Ok(Err(e)) => {
                debug!(host, error = %e, "DNS probe failed");
                false
            }
            Err(_) => {
                debug!(host, timeout = ?self.timeout, "DNS probe timed out");
                false
            }
        }
    }
}

impl Default for DnsProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_name_not_recorded() {
        let url = ParsedUrl::parse(&format!("https://{}.com", "x".repeat(69))).unwrap();
        assert!(!DnsProbe::with_timeout(Duration::from_secs(2)).is_recorded(&url).await);
    }

    #[tokio::test]
    async fn test_localhost_resolves() {
        assert!(DnsProbe::new().resolves("localhost").await);
    }

    #[tokio::test]
    #[ignore]
    async fn test_known_domain_recorded() {
        let url = ParsedUrl::parse("https://www.rust-lang.org").unwrap();
        assert!(DnsProbe::new().is_recorded(&url).await);
    }
}
