//! URL parsing into a validated, immutable `ParsedUrl`.
//!
//! Generic URI syntax is handled by the `url` crate; this module extracts
//! the host, hands its labels to the decomposer and assembles the record.

use crate::decompose::{decompose, HostParts};
use crate::error::UrlSplitError;
use crate::probes::{DnsProbe, HttpProbe};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use url::{Host, Url};

/// A URL split into its host components, path and query parameters.
///
/// Given `https://an.awesome.blog.boratanrikulu.dev.tr/blog/archlinux-install.html?q=a+lovely+query`:
///
/// | field         | value                          |
/// |---------------|--------------------------------|
/// | subdomains    | `an`, `awesome`, `blog`        |
/// | domain        | `boratanrikulu`                |
/// | tld           | `dev`                          |
/// | country_tld   | `tr`                           |
/// | full_domain   | `an.awesome.blog.boratanrikulu.dev.tr` |
/// | path          | `/blog/archlinux-install.html` |
/// | queries       | `q: ["a lovely query"]`        |
///
/// Instances only come out of [`ParsedUrl::parse`], so every field obeys the
/// decomposition invariants.
///
/// # Example
///
/// ```rust
/// use urlsplit_lib::ParsedUrl;
///
/// let url = ParsedUrl::parse("https://boratanrikulu.com.tr/about").unwrap();
/// assert_eq!(url.domain(), "boratanrikulu");
/// assert_eq!(url.tld(), "com");
/// assert_eq!(url.country_tld(), Some("tr"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedUrl {
    raw_url: String,
    subdomains: Vec<String>,
    domain: String,
    tld: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_tld: Option<String>,
    full_domain: String,
    path: String,
    queries: BTreeMap<String, Vec<String>>,
}

impl ParsedUrl {
    /// Parse and validate a raw URL string.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if the string is not a URI, has no host, or the host is an IP address
    /// - `InvalidHost` if the host has fewer than two labels or an empty label
    /// - `UnrecognizedSuffix` if the last host label is not a known TLD
    pub fn parse(raw_url: &str) -> Result<Self, UrlSplitError> {
        let url = Url::parse(raw_url)
            .map_err(|e| UrlSplitError::invalid_url(raw_url, e.to_string()))?;

        let host = match url.host() {
            Some(Host::Domain(host)) if !host.is_empty() => host.to_ascii_lowercase(),
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
                return Err(UrlSplitError::invalid_url(
                    raw_url,
                    "IP address hosts have no domain",
                ));
            }
            _ => return Err(UrlSplitError::invalid_url(raw_url, "URL has no host")),
        };

        let labels: Vec<&str> = host.split('.').collect();
        let HostParts {
            subdomains,
            domain,
            tld,
            country_tld,
        } = decompose(&labels)?;

        let mut queries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in url.query_pairs() {
            queries
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }

        debug!(url = raw_url, host = %host, "parsed URL");

        Ok(Self {
            raw_url: raw_url.to_string(),
            subdomains,
            domain,
            tld,
            country_tld,
            full_domain: host,
            path: escaped_path(raw_url, &url).to_string(),
            queries,
        })
    }

    /// The original input string.
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    pub fn subdomains(&self) -> &[String] {
        &self.subdomains
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn tld(&self) -> &str {
        &self.tld
    }

    pub fn country_tld(&self) -> Option<&str> {
        self.country_tld.as_deref()
    }

    /// Full hostname: subdomains, domain, TLD and country TLD joined by dots.
    pub fn full_domain(&self) -> &str {
        &self.full_domain
    }

    /// Percent-escaped path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decoded query parameters; repeated keys keep their values in input order.
    pub fn queries(&self) -> &BTreeMap<String, Vec<String>> {
        &self.queries
    }

    /// Values of a single query parameter.
    pub fn query(&self, name: &str) -> Option<&[String]> {
        self.queries.get(name).map(Vec::as_slice)
    }

    /// Host labels in order.
    pub fn host_labels(&self) -> Vec<&str> {
        self.full_domain.split('.').collect()
    }

    /// Public suffix, e.g. `com` or `com.tr`.
    pub fn public_suffix(&self) -> String {
        match &self.country_tld {
            Some(ctld) => format!("{}.{}", self.tld, ctld),
            None => self.tld.clone(),
        }
    }

    /// Registrable domain: the domain label plus its public suffix.
    pub fn registrable_domain(&self) -> String {
        format!("{}.{}", self.domain, self.public_suffix())
    }

    /// Whether an HTTP GET on the raw URL succeeds within five seconds.
    pub async fn is_live(&self) -> bool {
        match HttpProbe::new() {
            Ok(probe) => probe.is_live(self).await,
            Err(e) => {
                debug!(error = %e, "HTTP probe unavailable");
                false
            }
        }
    }

    /// Whether the full hostname resolves to at least one address.
    pub async fn is_recorded(&self) -> bool {
        DnsProbe::new().is_recorded(self).await
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw_url)
    }
}

impl std::str::FromStr for ParsedUrl {
    type Err = UrlSplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The path as written in the input.
///
/// `url` normalises an absent path to `/` for special schemes; an input with
/// nothing after the authority keeps an empty path.
fn escaped_path<'a>(raw_url: &str, url: &'a Url) -> &'a str {
    let path = url.path();
    if path != "/" {
        return path;
    }

    let trimmed = raw_url.trim();
    let after_scheme = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let path_written = after_scheme
        .find(['/', '\\', '?', '#'])
        .map(|idx| after_scheme[idx..].starts_with(['/', '\\']))
        .unwrap_or(false);

    if path_written {
        path
    } else {
        ""
    }
}

/// Parse a raw URL string. Shorthand for [`ParsedUrl::parse`].
pub fn parse(raw_url: &str) -> Result<ParsedUrl, UrlSplitError> {
    ParsedUrl::parse(raw_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG_URL: &str = "https://an.awesome.blog.boratanrikulu.dev.tr/blog/archlinux-install.html?q=a+lovely+query&z=another+query";

    #[test]
    fn test_parse_full_url() {
        let url = ParsedUrl::parse(BLOG_URL).unwrap();
        assert_eq!(url.raw_url(), BLOG_URL);
        assert_eq!(url.subdomains(), ["an", "awesome", "blog"]);
        assert_eq!(url.domain(), "boratanrikulu");
        assert_eq!(url.tld(), "dev");
        assert_eq!(url.country_tld(), Some("tr"));
        assert_eq!(url.full_domain(), "an.awesome.blog.boratanrikulu.dev.tr");
        assert_eq!(url.path(), "/blog/archlinux-install.html");
        assert_eq!(url.query("q"), Some(&["a lovely query".to_string()][..]));
        assert_eq!(url.query("z"), Some(&["another query".to_string()][..]));
        assert_eq!(url.queries().len(), 2);
    }

    #[test]
    fn test_parse_without_country_tld() {
        let url = ParsedUrl::parse("https://boratanrikulu.dev/dns-guvenlik-sorunlari").unwrap();
        assert!(url.subdomains().is_empty());
        assert_eq!(url.domain(), "boratanrikulu");
        assert_eq!(url.tld(), "dev");
        assert_eq!(url.country_tld(), None);
        assert_eq!(url.path(), "/dns-guvenlik-sorunlari");
        assert!(url.queries().is_empty());
    }

    #[test]
    fn test_repeated_query_keys_keep_order() {
        let url = ParsedUrl::parse("https://example.com/?tag=b&tag=a&tag=c").unwrap();
        assert_eq!(
            url.query("tag").unwrap(),
            ["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_host_only_url_has_empty_path() {
        assert_eq!(ParsedUrl::parse("https://bora.fi").unwrap().path(), "");
        assert_eq!(ParsedUrl::parse("https://boratanrikulu.com.tr").unwrap().path(), "");
        assert_eq!(ParsedUrl::parse("https://bora.fi?q=rust").unwrap().path(), "");
        assert_eq!(ParsedUrl::parse("https://bora.fi:8080#top").unwrap().path(), "");
    }

    #[test]
    fn test_root_path_kept_when_written() {
        assert_eq!(ParsedUrl::parse("https://bora.fi/").unwrap().path(), "/");
        assert_eq!(ParsedUrl::parse("https://bora.fi/?q=rust").unwrap().path(), "/");
    }

    #[test]
    fn test_escaped_path_kept() {
        let url = ParsedUrl::parse("https://example.com/a%20b/c").unwrap();
        assert_eq!(url.path(), "/a%20b/c");
    }

    #[test]
    fn test_host_is_lowercased() {
        let url = ParsedUrl::parse("https://Blog.Example.COM").unwrap();
        assert_eq!(url.subdomains(), ["blog"]);
        assert_eq!(url.domain(), "example");
        assert_eq!(url.tld(), "com");
    }

    #[test]
    fn test_port_and_credentials_ignored_for_host() {
        let url = ParsedUrl::parse("https://user:pw@api.example.com:8443/v1").unwrap();
        assert_eq!(url.full_domain(), "api.example.com");
        assert_eq!(url.path(), "/v1");
    }

    #[test]
    fn test_failures() {
        assert!(matches!(
            ParsedUrl::parse(""),
            Err(UrlSplitError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ParsedUrl::parse("boratanrikulu.dev"),
            Err(UrlSplitError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ParsedUrl::parse("https://boratanrikulu"),
            Err(UrlSplitError::InvalidHost { .. })
        ));
        assert!(matches!(
            ParsedUrl::parse("https://boratanrikulu.randomwrongtld"),
            Err(UrlSplitError::UnrecognizedSuffix { .. })
        ));
        assert!(matches!(
            ParsedUrl::parse("https://127.0.0.1/"),
            Err(UrlSplitError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ParsedUrl::parse("mailto:someone@example.com"),
            Err(UrlSplitError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_suffix_helpers() {
        let url = ParsedUrl::parse("https://www.boratanrikulu.com.tr").unwrap();
        assert_eq!(url.public_suffix(), "com.tr");
        assert_eq!(url.registrable_domain(), "boratanrikulu.com.tr");
        assert_eq!(url.host_labels(), vec!["www", "boratanrikulu", "com", "tr"]);

        let url = ParsedUrl::parse("https://bora.fi").unwrap();
        assert_eq!(url.public_suffix(), "fi");
        assert_eq!(url.registrable_domain(), "bora.fi");
    }

    #[test]
    fn test_from_str_and_display() {
        let url: ParsedUrl = "https://bora.fi".parse().unwrap();
        assert_eq!(url.to_string(), "https://bora.fi");
    }

    #[test]
    fn test_serializes_without_empty_country_tld() {
        let url = ParsedUrl::parse("https://boratanrikulu.dev").unwrap();
        let json = serde_json::to_value(&url).unwrap();
        assert_eq!(json["domain"], "boratanrikulu");
        assert!(json.get("country_tld").is_none());
    }
}
