//! HTTP liveness probe.
//!
//! Issues a single GET against the URL exactly as the user supplied it.
//! Any HTTP response, whatever the status code, means the site is up.

use crate::error::UrlSplitError;
use crate::parser::ParsedUrl;
use crate::probes::DEFAULT_PROBE_TIMEOUT;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper for liveness checks.
#[derive(Clone)]
pub struct HttpProbe {
    /// HTTP client for making GET requests
    http_client: reqwest::Client,
    /// Overall budget for a single request
    timeout: Duration,
}

impl HttpProbe {
    /// Create a new HTTP probe with the default five second timeout.
    pub fn new() -> Result<Self, UrlSplitError> {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    /// Create a new HTTP probe with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, UrlSplitError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                UrlSplitError::network_with_source(
                    "Failed to create HTTP probe client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    /// Configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check whether the URL answers an HTTP GET.
    ///
    /// Connection failures, TLS errors and timeouts all yield `false`.
    pub async fn is_live(&self, url: &ParsedUrl) -> bool {
        let request = self.http_client.get(url.raw_url()).send();

        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                debug!(url = url.raw_url(), status = %response.status(), "HTTP probe answered");
                true
            }
            Ok(Err(e)) => {
                debug!(url = url.raw_url(), error = %self.request_error(e), "HTTP probe failed");
                false
            }
            Err(_) => {
                debug!(url = url.raw_url(), timeout = ?self.timeout, "HTTP probe timed out");
                false
            }
        }
    }

    /// Classify a request failure, reporting timeouts with this probe's budget.
    fn request_error(&self, err: reqwest::Error) -> UrlSplitError {
        if err.is_timeout() {
            UrlSplitError::timeout("HTTP request", self.timeout)
        } else {
            UrlSplitError::from(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_timeout_kept() {
        let probe = HttpProbe::with_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(probe.timeout(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_timeout_error_reports_configured_budget() {
        // Accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let probe = HttpProbe::with_timeout(Duration::from_millis(200)).unwrap();
        let err = probe
            .http_client
            .get(format!("http://{}/", addr))
            .send()
            .await
            .unwrap_err();

        assert_eq!(
            probe.request_error(err),
            UrlSplitError::timeout("HTTP request", Duration::from_millis(200))
        );
        drop(listener);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_not_live() {
        // A 69-character label is not a valid DNS name, so the lookup fails locally.
        let url = ParsedUrl::parse(&format!("https://{}.com", "x".repeat(69))).unwrap();
        let probe = HttpProbe::with_timeout(Duration::from_secs(2)).unwrap();
        assert!(!probe.is_live(&url).await);
    }

    #[tokio::test]
    #[ignore]
    async fn test_known_site_is_live() {
        let url = ParsedUrl::parse("https://www.rust-lang.org").unwrap();
        assert!(HttpProbe::new().unwrap().is_live(&url).await);
    }
}
