//! Batch URL parsing and probing.
//!
//! `UrlProber` parses each input, then runs the enabled HTTP and DNS probes
//! for it. Many URLs are handled concurrently, bounded by the configured
//! concurrency.

use crate::error::UrlSplitError;
use crate::parser::ParsedUrl;
use crate::probes::{DnsProbe, HttpProbe};
use crate::types::{ProbeConfig, ProbeResult};
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::time::Instant;
use tracing::debug;

/// Coordinates parsing and network probes for one or many URLs.
///
/// # Example
///
/// ```rust,no_run
/// use urlsplit_lib::{ProbeConfig, UrlProber};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let prober = UrlProber::with_config(ProbeConfig::default().with_dns(false))?;
///     let result = prober.probe_url("https://boratanrikulu.dev").await?;
///     println!("live: {:?}", result.live);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct UrlProber {
    config: ProbeConfig,
    http_probe: HttpProbe,
    dns_probe: DnsProbe,
}

impl UrlProber {
    /// Create a prober with default configuration.
    ///
    /// Default settings:
    /// - Concurrency: 10
    /// - Timeout: 5 seconds
    /// - Both probes enabled
    pub fn new() -> Result<Self, UrlSplitError> {
        Self::with_config(ProbeConfig::default())
    }

    /// Create a prober with custom configuration.
    pub fn with_config(config: ProbeConfig) -> Result<Self, UrlSplitError> {
        let http_probe = HttpProbe::with_timeout(config.timeout)?;
        let dns_probe = DnsProbe::with_timeout(config.timeout);

        Ok(Self {
            config,
            http_probe,
            dns_probe,
        })
    }

    /// Get the current configuration for this prober.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Parse one URL and run the enabled probes on it.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the URL is invalid. Probe failures are
    /// never errors; they show up as `Some(false)`.
    pub async fn probe_url(&self, raw_url: &str) -> Result<ProbeResult, UrlSplitError> {
        let parsed = ParsedUrl::parse(raw_url)?;
        let start_time = Instant::now();

        let live = async {
            if self.config.check_live {
                Some(self.http_probe.is_live(&parsed).await)
            } else {
                None
            }
        };
        let resolvable = async {
            if self.config.check_dns {
                Some(self.dns_probe.is_recorded(&parsed).await)
            } else {
                None
            }
        };
        let (live, resolvable) = tokio::join!(live, resolvable);

        let probe_duration = start_time.elapsed();
        debug!(url = raw_url, ?live, ?resolvable, ?probe_duration, "probed URL");

        Ok(ProbeResult {
            url: raw_url.to_string(),
            parsed: Some(parsed),
            live,
            resolvable,
            probe_duration: Some(probe_duration),
            error_message: None,
        })
    }

    /// Probe a URL, folding a parse error into the result.
    async fn probe_or_record(&self, raw_url: &str) -> ProbeResult {
        match self.probe_url(raw_url).await {
            Ok(result) => result,
            Err(e) => ProbeResult::failed(raw_url, e.to_string()),
        }
    }

    /// Probe many URLs concurrently.
    ///
    /// # Returns
    ///
    /// One `ProbeResult` per input, in input order. Invalid URLs carry an
    /// `error_message` instead of probe answers.
    pub async fn probe_urls(&self, urls: &[String]) -> Vec<ProbeResult> {
        let pending = urls.iter().enumerate().map(|(idx, url)| async move {
            (idx, self.probe_or_record(url).await)
        });

        let mut indexed: Vec<(usize, ProbeResult)> = futures::stream::iter(pending)
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        indexed.sort_by_key(|(idx, _)| *idx);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    /// Probe URLs and yield results as they complete (not in input order).
    pub fn probe_urls_stream(
        &self,
        urls: &[String],
    ) -> Pin<Box<dyn Stream<Item = ProbeResult> + Send + '_>> {
        let urls = urls.to_vec();
        let stream = futures::stream::iter(urls)
            .map(move |url| async move { self.probe_or_record(&url).await })
            .buffer_unordered(self.config.concurrency);

        Box::pin(stream)
    }

    /// Parse URLs without touching the network.
    pub fn parse_urls(&self, urls: &[String]) -> Vec<Result<ParsedUrl, UrlSplitError>> {
        urls.iter().map(|url| ParsedUrl::parse(url)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_prober() -> UrlProber {
        UrlProber::with_config(ProbeConfig::default().with_live(false).with_dns(false)).unwrap()
    }

    #[tokio::test]
    async fn test_probe_url_with_probes_disabled() {
        let prober = offline_prober();
        let result = prober.probe_url("https://bora.fi").await.unwrap();
        assert!(result.is_valid());
        assert_eq!(result.live, None);
        assert_eq!(result.resolvable, None);
        assert_eq!(result.parsed.unwrap().domain(), "bora");
    }

    #[tokio::test]
    async fn test_probe_url_propagates_parse_error() {
        let prober = offline_prober();
        let err = prober.probe_url("https://boratanrikulu").await.unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[tokio::test]
    async fn test_probe_urls_keeps_input_order() {
        let prober = offline_prober();
        let urls: Vec<String> = [
            "https://a.example.com",
            "not a url",
            "https://boratanrikulu.com.tr",
            "https://boratanrikulu.randomwrongtld",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let results = prober.probe_urls(&urls).await;
        assert_eq!(results.len(), 4);
        for (result, url) in results.iter().zip(&urls) {
            assert_eq!(&result.url, url);
        }
        assert!(results[0].is_valid());
        assert!(!results[1].is_valid());
        assert!(results[2].is_valid());
        assert!(results[3].error_message.is_some());
    }

    #[tokio::test]
    async fn test_stream_yields_every_url() {
        let prober = offline_prober();
        let urls = vec!["https://bora.fi".to_string(), "https://x".to_string()];
        let results: Vec<ProbeResult> = prober.probe_urls_stream(&urls).collect().await;
        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_valid()).count(), 1);
    }

    #[test]
    fn test_parse_urls() {
        let prober = offline_prober();
        let results = prober.parse_urls(&["https://bora.fi".to_string(), "".to_string()]);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
