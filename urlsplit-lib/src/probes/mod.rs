//! Network probes for parsed URLs.
//!
//! Both probes answer a plain yes/no question and never surface transport
//! errors: anything that goes wrong, including the timeout expiring, is
//! reported as `false`.

/// HTTP liveness probe
pub mod http;

/// DNS resolution probe
pub mod dns;

pub use dns::DnsProbe;
pub use http::HttpProbe;

use std::time::Duration;

/// Timeout applied by both probes unless configured otherwise.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
