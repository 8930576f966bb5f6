//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and
//! `USPLIT_*` environment variables, and merging them with proper precedence.

use crate::error::UrlSplitError;
use crate::types::{OutputFormat, ProbeConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for probe options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Output formatting preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default timeout (as string, e.g., "5s", "30s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Run the HTTP liveness probe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<bool>,

    /// Run the DNS probe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format: "text", "json" or "csv"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Styled output with header and summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

impl FileConfig {
    /// Apply file defaults on top of a probe configuration.
    pub fn apply_to(&self, mut config: ProbeConfig) -> ProbeConfig {
        if let Some(defaults) = &self.defaults {
            if let Some(concurrency) = defaults.concurrency {
                config = config.with_concurrency(concurrency);
            }
            if let Some(secs) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
                config = config.with_timeout(Duration::from_secs(secs));
            }
            if let Some(live) = defaults.live {
                config = config.with_live(live);
            }
            if let Some(dns) = defaults.dns {
                config = config.with_dns(dns);
            }
        }
        config
    }

    /// Output format from the `[output]` table, if set and valid.
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output
            .as_ref()
            .and_then(|o| o.default_format.as_deref())
            .and_then(|f| f.parse().ok())
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if parsing fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, UrlSplitError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(UrlSplitError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            UrlSplitError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            UrlSplitError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;
        debug!(path = %path.display(), "loaded configuration file");

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is lowest, then the home directory file, then the local
    /// directory file. Later files override earlier ones field by field.
    pub fn discover_and_load(&self) -> Result<FileConfig, UrlSplitError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) if self.verbose => warn!("Skipping config file: {}", e),
                Err(_) => {}
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            for path in &loaded_files {
                debug!(path = %path.display(), "merged configuration file");
            }
        }

        Ok(merged_config)
    }

    /// Local configuration in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./urlsplit.toml", "./.urlsplit.toml"]
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Global configuration in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".urlsplit.toml", "urlsplit.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// XDG Base Directory configuration.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("urlsplit").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.live.is_some() {
                        lower_defaults.live = higher_defaults.live;
                    }
                    if higher_defaults.dns.is_some() {
                        lower_defaults.dns = higher_defaults.dns;
                    }
                    Some(lower_defaults)
                }
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            output: match (lower.output, higher.output) {
                (Some(mut lower_output), Some(higher_output)) => {
                    if higher_output.default_format.is_some() {
                        lower_output.default_format = higher_output.default_format;
                    }
                    if higher_output.pretty.is_some() {
                        lower_output.pretty = higher_output.pretty;
                    }
                    Some(lower_output)
                }
                (lower_output, higher_output) => higher_output.or(lower_output),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), UrlSplitError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(UrlSplitError::config(
                        "Concurrency must be between 1 and 100",
                    ));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(UrlSplitError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }
        }

        if let Some(format) = config.output.as_ref().and_then(|o| o.default_format.as_ref()) {
            format.parse::<OutputFormat>().map_err(UrlSplitError::config)?;
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via `USPLIT_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub live: Option<bool>,
    pub dns: Option<bool>,
    pub json: Option<bool>,
    pub csv: Option<bool>,
    pub pretty: Option<bool>,
    pub file: Option<String>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Apply environment values on top of a probe configuration.
    pub fn apply_to(&self, mut config: ProbeConfig) -> ProbeConfig {
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(secs) = self.timeout.as_deref().and_then(parse_timeout_string) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(live) = self.live {
            config = config.with_live(live);
        }
        if let Some(dns) = self.dns {
            config = config.with_dns(dns);
        }
        config
    }

    /// Check if output format conflicts exist (JSON and CSV both set).
    pub fn has_output_format_conflict(&self) -> bool {
        matches!((self.json, self.csv), (Some(true), Some(true)))
    }
}

/// Load configuration from environment variables.
///
/// Parses all `USPLIT_*` environment variables. Invalid values are logged as
/// warnings and ignored.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    load_env_config_from(verbose, |key| env::var(key).ok())
}

/// Same as [`load_env_config`] with an injectable variable source.
fn load_env_config_from<F>(verbose: bool, get: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(val) = get("USPLIT_CONCURRENCY") {
        match val.parse::<usize>() {
            Ok(concurrency) if concurrency > 0 && concurrency <= 100 => {
                env_config.concurrency = Some(concurrency);
                if verbose {
                    debug!("Using USPLIT_CONCURRENCY={}", concurrency);
                }
            }
            _ => warn!(
                "Invalid USPLIT_CONCURRENCY='{}', must be between 1 and 100",
                val
            ),
        }
    }

    if let Some(val) = get("USPLIT_TIMEOUT") {
        if parse_timeout_string(&val).is_some() {
            env_config.timeout = Some(val);
        } else {
            warn!("Invalid USPLIT_TIMEOUT='{}', use format like '5s' or '2m'", val);
        }
    }

    env_config.live = env_bool(&get, "USPLIT_LIVE");
    env_config.dns = env_bool(&get, "USPLIT_DNS");
    env_config.json = env_bool(&get, "USPLIT_JSON");
    env_config.csv = env_bool(&get, "USPLIT_CSV");
    env_config.pretty = env_bool(&get, "USPLIT_PRETTY");

    env_config.file = get("USPLIT_FILE").filter(|s| !s.trim().is_empty());
    env_config.config = get("USPLIT_CONFIG").filter(|s| !s.trim().is_empty());

    env_config
}

fn env_bool<F>(get: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let val = get(key)?;
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => {
            warn!("Invalid {}='{}', expected true or false", key, val);
            None
        }
    }
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// A bare number is read as seconds. Returns `None` if parsing fails.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(5));
        assert_eq!(parse_timeout_string("30s"), Some(30));
        assert_eq!(parse_timeout_string("2m"), Some(120));
        assert_eq!(parse_timeout_string("5"), Some(5));
        assert_eq!(parse_timeout_string("invalid"), None);
    }

    #[test]
    fn test_parse_timeout_string_rejects_overflowing_minutes() {
        assert_eq!(parse_timeout_string(&format!("{}m", u64::MAX)), None);
        assert_eq!(parse_timeout_string(&format!("{}m", u64::MAX / 60)), Some(u64::MAX / 60 * 60));
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[defaults]
concurrency = 25
timeout = "3s"
live = false

[output]
default_format = "json"
pretty = true
"#,
        );

        let manager = ConfigManager::new(false);
        let config = manager.load_file(temp_file.path()).unwrap();

        let defaults = config.defaults.clone().unwrap();
        assert_eq!(defaults.concurrency, Some(25));
        assert_eq!(defaults.live, Some(false));
        assert_eq!(defaults.dns, None);
        assert_eq!(config.output_format(), Some(OutputFormat::Json));

        let probe = config.apply_to(ProbeConfig::default());
        assert_eq!(probe.concurrency, 25);
        assert_eq!(probe.timeout, Duration::from_secs(3));
        assert!(!probe.check_live);
        assert!(probe.check_dns);
    }

    #[test]
    fn test_invalid_concurrency() {
        let temp_file = write_config("[defaults]\nconcurrency = 0\n");
        let manager = ConfigManager::new(false);
        assert!(matches!(
            manager.load_file(temp_file.path()),
            Err(UrlSplitError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_timeout_and_format() {
        let manager = ConfigManager::new(false);

        let temp_file = write_config("[defaults]\ntimeout = \"soon\"\n");
        assert!(manager.load_file(temp_file.path()).is_err());

        let temp_file = write_config("[output]\ndefault_format = \"yaml\"\n");
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let manager = ConfigManager::new(false);
        assert!(matches!(
            manager.load_file("/no/such/urlsplit.toml"),
            Err(UrlSplitError::FileError { .. })
        ));

        let temp_file = write_config("[defaults\nconcurrency = ");
        assert!(matches!(
            manager.load_file(temp_file.path()),
            Err(UrlSplitError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(10),
                live: Some(false),
                ..Default::default()
            }),
            output: Some(OutputConfig {
                default_format: Some("csv".to_string()),
                pretty: None,
            }),
        };

        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(25),
                dns: Some(false),
                ..Default::default()
            }),
            output: None,
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.clone().unwrap();

        assert_eq!(defaults.concurrency, Some(25)); // Higher wins
        assert_eq!(defaults.live, Some(false)); // Lower preserved
        assert_eq!(defaults.dns, Some(false));
        assert_eq!(merged.output_format(), Some(OutputFormat::Csv));
    }

    #[test]
    fn test_env_config_parsing() {
        let vars: HashMap<&str, &str> = [
            ("USPLIT_CONCURRENCY", "30"),
            ("USPLIT_TIMEOUT", "1m"),
            ("USPLIT_LIVE", "no"),
            ("USPLIT_DNS", "maybe"),
            ("USPLIT_JSON", "true"),
            ("USPLIT_CSV", "1"),
        ]
        .into_iter()
        .collect();

        let env_config =
            load_env_config_from(false, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(env_config.concurrency, Some(30));
        assert_eq!(env_config.timeout.as_deref(), Some("1m"));
        assert_eq!(env_config.live, Some(false));
        assert_eq!(env_config.dns, None);
        assert!(env_config.has_output_format_conflict());

        let probe = env_config.apply_to(ProbeConfig::default());
        assert_eq!(probe.concurrency, 30);
        assert_eq!(probe.timeout, Duration::from_secs(60));
        assert!(!probe.check_live);
    }

    #[test]
    fn test_env_config_rejects_bad_concurrency() {
        let env_config = load_env_config_from(false, |key| {
            (key == "USPLIT_CONCURRENCY").then(|| "500".to_string())
        });
        assert_eq!(env_config.concurrency, None);
    }
}
