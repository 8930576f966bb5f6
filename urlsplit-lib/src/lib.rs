//! # urlsplit library
//!
//! Split URLs into subdomains, registrable domain, top-level domain and an
//! optional country-code suffix, using built-in tables of known TLDs rather
//! than plain "last label is the TLD" guessing.
//!
//! ## Quick Start
//!
//! ```rust
//! use urlsplit_lib::parse;
//!
//! let url = parse("https://an.awesome.blog.boratanrikulu.dev.tr/blog?q=rust").unwrap();
//! assert_eq!(url.subdomains(), ["an", "awesome", "blog"]);
//! assert_eq!(url.domain(), "boratanrikulu");
//! assert_eq!(url.tld(), "dev");
//! assert_eq!(url.country_tld(), Some("tr"));
//! ```
//!
//! ## Features
//!
//! - **Suffix tables**: ~1260 generic TLDs and ~250 country codes, compiled in
//! - **Decomposition**: generic-TLD + country-TLD pairs such as `com.tr`
//! - **Probes**: HTTP liveness and DNS resolution checks with bounded timeouts
//! - **Batch probing**: concurrent checks over many URLs
//! - **Configurable**: TOML files and `USPLIT_*` environment variables

pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
    OutputConfig,
};
pub use decompose::{decompose, HostParts};
pub use error::UrlSplitError;
pub use parser::{parse, ParsedUrl};
pub use prober::UrlProber;
pub use probes::{DnsProbe, HttpProbe, DEFAULT_PROBE_TIMEOUT};
pub use suffix::{get_all_known_tlds, is_country_tld, is_generic_tld, SuffixTable};
pub use types::{OutputFormat, ProbeConfig, ProbeResult};
pub use utils::{read_url_file, read_url_lines};

mod config;
mod decompose;
mod error;
mod parser;
mod prober;
mod probes;
mod suffix;
mod types;
mod utils;

/// Type alias for convenience
pub type Result<T> = std::result::Result<T, UrlSplitError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        generic_tlds: SuffixTable::Generic.len(),
        country_tlds: SuffixTable::Country.len(),
    }
}

/// Information about the library build and its suffix tables
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub generic_tlds: usize,
    pub country_tlds: usize,
}
