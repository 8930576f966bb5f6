//! Core data types for probing parsed URLs.
//!
//! This module defines the probe configuration and the per-URL result
//! record produced by `UrlProber`.

use crate::parser::ParsedUrl;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of probing one input URL.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    /// The URL exactly as it was given
    pub url: String,

    /// Decomposition, absent when parsing failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ParsedUrl>,

    /// Whether an HTTP GET succeeded.
    /// - `Some(true)`: the site answered
    /// - `Some(false)`: no answer within the timeout
    /// - `None`: probe disabled or URL invalid
    pub live: Option<bool>,

    /// Whether the full hostname resolved; `None` if not checked
    pub resolvable: Option<bool>,

    /// How long the probes took
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_duration: Option<Duration>,

    /// Parse error message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ProbeResult {
    /// Result for an input that could not be parsed.
    pub fn failed<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self {
            url: url.into(),
            parsed: None,
            live: None,
            resolvable: None,
            probe_duration: None,
            error_message: Some(message.into()),
        }
    }

    /// Parse-only result: no probes run.
    pub fn from_parse<U: Into<String>>(
        url: U,
        parsed: Result<ParsedUrl, crate::error::UrlSplitError>,
    ) -> Self {
        match parsed {
            Ok(parsed) => Self {
                url: url.into(),
                parsed: Some(parsed),
                live: None,
                resolvable: None,
                probe_duration: None,
                error_message: None,
            },
            Err(e) => Self::failed(url, e.to_string()),
        }
    }

    /// Whether the input parsed successfully.
    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }
}

/// Configuration options for probing operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Maximum number of URLs probed at once
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Timeout for each individual probe
    /// Default: 5 seconds
    #[serde(skip)]
    pub timeout: Duration,

    /// Run the HTTP liveness probe
    /// Default: true
    pub check_live: bool,

    /// Run the DNS resolution probe
    /// Default: true
    pub check_dns: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout: Duration::from_secs(5),
            check_live: true,
            check_dns: true,
        }
    }
}

impl ProbeConfig {
    /// Set concurrency, clamped to 1..=100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set custom timeout for each probe.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable the HTTP liveness probe.
    pub fn with_live(mut self, enabled: bool) -> Self {
        self.check_live = enabled;
        self
    }

    /// Enable or disable the DNS probe.
    pub fn with_dns(mut self, enabled: bool) -> Self {
        self.check_dns = enabled;
        self
    }
}

/// Output format for displaying results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,

    /// Pretty-printed JSON array
    Json,

    /// Comma-separated values with a header row
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "Unknown output format '{}'. Use text, json or csv",
                other
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_clamped() {
        assert_eq!(ProbeConfig::default().with_concurrency(0).concurrency, 1);
        assert_eq!(ProbeConfig::default().with_concurrency(500).concurrency, 100);
        assert_eq!(ProbeConfig::default().with_concurrency(25).concurrency, 25);
    }

    #[test]
    fn test_builder_toggles() {
        let config = ProbeConfig::default()
            .with_live(false)
            .with_dns(true)
            .with_timeout(Duration::from_secs(2));
        assert!(!config.check_live);
        assert!(config.check_dns);
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!(" text ".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_failed_result() {
        let result = ProbeResult::failed("https://nope", "bad host");
        assert!(!result.is_valid());
        assert_eq!(result.live, None);
        assert_eq!(result.error_message.as_deref(), Some("bad host"));
    }

    #[test]
    fn test_from_parse() {
        let ok = ProbeResult::from_parse("https://bora.fi", ParsedUrl::parse("https://bora.fi"));
        assert!(ok.is_valid());
        assert_eq!(ok.live, None);

        let err = ProbeResult::from_parse("https://bora", ParsedUrl::parse("https://bora"));
        assert!(!err.is_valid());
        assert!(err.error_message.unwrap().contains("Invalid host"));
    }
}
