//! Hostname decomposition into subdomains, domain and public suffix.
//!
//! The suffix is either a single known label (`com`, `fi`) or the pair
//! generic-TLD + country-TLD (`com.tr`, `dev.tr`). No other two-label
//! patterns are recognised: a country code preceded by anything that is not
//! a generic TLD is treated as a bare single-label suffix.

use crate::error::UrlSplitError;
use crate::suffix::{is_country_tld, is_generic_tld};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Result of splitting a host's labels around its public suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostParts {
    /// Labels left of the registrable domain, outermost first
    pub subdomains: Vec<String>,

    /// The registrable label immediately preceding the suffix
    pub domain: String,

    /// Generic TLD, or a bare country code used as the only suffix label
    pub tld: String,

    /// Country code when the suffix is a generic-TLD + country-TLD pair
    pub country_tld: Option<String>,
}

impl HostParts {
    /// Number of trailing labels that form the public suffix (1 or 2).
    pub fn suffix_len(&self) -> usize {
        if self.country_tld.is_some() {
            2
        } else {
            1
        }
    }

    /// All labels back in host order.
    pub fn labels(&self) -> Vec<&str> {
        self.subdomains
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.domain.as_str()))
            .chain(std::iter::once(self.tld.as_str()))
            .chain(self.country_tld.as_deref())
            .collect()
    }

    /// Labels joined back into a hostname.
    pub fn full_domain(&self) -> String {
        self.labels().join(".")
    }
}

/// Split hostname labels into subdomains, domain, TLD and country TLD.
///
/// # Arguments
///
/// * `labels` - Dot-separated host labels, lowercase, in host order
///
/// # Errors
///
/// Returns `UrlSplitError::InvalidHost` for fewer than two labels, empty
/// labels, or a suffix leaving no room for a domain, and
/// `UrlSplitError::UnrecognizedSuffix` when the last label is in neither table.
pub fn decompose(labels: &[&str]) -> Result<HostParts, UrlSplitError> {
    let host = labels.join(".");

    if labels.len() < 2 {
        return Err(UrlSplitError::invalid_host(
            host,
            "Host needs at least a domain and a top-level domain",
        ));
    }

    if labels.iter().any(|label| label.is_empty()) {
        return Err(UrlSplitError::invalid_host(host, "Host contains an empty label"));
    }

    let count = labels.len();
    let last = labels[count - 1];

    let suffix_len = if is_country_tld(last) {
        // Two-label hosts never take the pair form; the domain would be empty.
        if count >= 3 && is_generic_tld(labels[count - 2]) {
            2
        } else {
            1
        }
    } else if is_generic_tld(last) {
        1
    } else {
        return Err(UrlSplitError::unrecognized_suffix(host, last));
    };

    if count < suffix_len + 1 {
        return Err(UrlSplitError::invalid_host(host, "No label left for the domain"));
    }

    let domain_idx = count - suffix_len - 1;
    let (tld, country_tld) = if suffix_len == 2 {
        (labels[count - 2], Some(last.to_string()))
    } else {
        (last, None)
    };

    trace!(
        host = %host,
        suffix_len,
        domain = labels[domain_idx],
        "decomposed host"
    );

    Ok(HostParts {
        subdomains: labels[..domain_idx].iter().map(|s| s.to_string()).collect(),
        domain: labels[domain_idx].to_string(),
        tld: tld.to_string(),
        country_tld,
    })
}
