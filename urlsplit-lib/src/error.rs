//! Error handling for URL decomposition and probing.
//!
//! Parse failures keep their own kinds (`InvalidUrl`, `InvalidHost`,
//! `UnrecognizedSuffix`) so callers can report precise diagnostics, while
//! `is_invalid_url()` folds them back into a single validation signal.

use std::fmt;

/// Main error type for URL splitting operations.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlSplitError {
    /// Input is not a URI, has no scheme, or has no usable host
    InvalidUrl { url: String, reason: String },

    /// Host cannot be partitioned into domain and suffix
    InvalidHost { host: String, reason: String },

    /// Trailing host label is in neither suffix table
    UnrecognizedSuffix { host: String, label: String },

    /// Network-related errors (client construction, connection)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Configuration errors (invalid settings, bad TOML, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading URL lists or configs
    FileError { path: String, message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl UrlSplitError {
    /// Create a new invalid URL error.
    pub fn invalid_url<U: Into<String>, R: Into<String>>(url: U, reason: R) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid host error.
    pub fn invalid_host<H: Into<String>, R: Into<String>>(host: H, reason: R) -> Self {
        Self::InvalidHost {
            host: host.into(),
            reason: reason.into(),
        }
    }

    /// Create a new unrecognized suffix error.
    pub fn unrecognized_suffix<H: Into<String>, L: Into<String>>(host: H, label: L) -> Self {
        Self::UnrecognizedSuffix {
            host: host.into(),
            label: label.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error means the input could not be parsed as a URL.
    ///
    /// True for every decomposition failure, regardless of the finer kind.
    pub fn is_invalid_url(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::InvalidHost { .. } | Self::UnrecognizedSuffix { .. }
        )
    }
}

impl fmt::Display for UrlSplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url, reason } => {
                write!(f, "Invalid URL '{}': {}", url, reason)
            }
            Self::InvalidHost { host, reason } => {
                write!(f, "Invalid host '{}': {}", host, reason)
            }
            Self::UnrecognizedSuffix { host, label } => {
                write!(f, "Unrecognized suffix '{}' in host '{}'", label, host)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for UrlSplitError {}

impl From<url::ParseError> for UrlSplitError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: String::new(),
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for UrlSplitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<std::io::Error> for UrlSplitError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}
