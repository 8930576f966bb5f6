//! urlsplit CLI Application
//!
//! Splits URLs into subdomains, domain, TLD and country-code TLD, and can
//! optionally check whether each site answers HTTP and resolves in DNS.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use futures::StreamExt;
use std::process;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use urlsplit_lib::{
    load_env_config, parse_timeout_string, read_url_file, ConfigManager, EnvConfig, FileConfig,
    OutputFormat, ParsedUrl, ProbeConfig, ProbeResult, UrlProber,
};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for urlsplit
#[derive(Parser, Debug)]
#[command(name = "urlsplit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Split URLs into subdomains, domain, TLD and country-code TLD")]
#[command(
    long_about = "Split URLs into subdomains, registrable domain, TLD and country-code TLD using built-in suffix tables.\n\nOptionally checks HTTP liveness (--live) and DNS resolution (--dns)."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// URLs to split (scheme required, e.g. https://example.com)
    #[arg(value_name = "URLS", help_heading = "Input")]
    pub urls: Vec<String>,

    /// Input file with URLs (one per line, # comments allowed)
    #[arg(short = 'f', long = "file", value_name = "FILE", help_heading = "Input")]
    pub file: Option<String>,

    /// Check whether each URL answers an HTTP GET
    #[arg(long = "live", help_heading = "Probes")]
    pub live: bool,

    /// Check whether each host resolves in DNS
    #[arg(long = "dns", help_heading = "Probes")]
    pub dns: bool,

    /// Per-probe timeout (e.g. 5s, 2m)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Probes")]
    pub timeout: Option<String>,

    /// Max concurrent probes (default: 10, max: 100)
    #[arg(short = 'c', long = "concurrency", help_heading = "Probes")]
    pub concurrency: Option<usize>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Output results in CSV format
    #[arg(long = "csv", help_heading = "Output Format")]
    pub csv: bool,

    /// Labelled, multi-line output with header and summary
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show timings and trace-level logs
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Settings resolved from config files, environment and CLI flags.
#[derive(Debug)]
struct Settings {
    probe: ProbeConfig,
    format: OutputFormat,
    pretty: bool,
}

impl Settings {
    fn probes_enabled(&self) -> bool {
        self.probe.check_live || self.probe.check_dns
    }

    fn probe_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.probe.check_live {
            names.push("live");
        }
        if self.probe.check_dns {
            names.push("dns");
        }
        names
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args, |key| std::env::var(key).ok()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging(&args);

    match run(args).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Route library `tracing` output to stderr.
///
/// `RUST_LOG` wins; otherwise `-d` enables trace, `-v` debug, default warn.
fn init_logging(args: &Args) {
    let level = if args.debug {
        "urlsplit=trace,urlsplit_lib=trace"
    } else if args.verbose {
        "urlsplit=debug,urlsplit_lib=debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Validate command line arguments, reading environment variables through `get_env`
fn validate_args<F>(args: &Args, get_env: F) -> Result<(), String>
where
    F: Fn(&str) -> Option<String>,
{
    if args.urls.is_empty() && args.file.is_none() && get_env("USPLIT_FILE").is_none() {
        return Err("You must specify URLs or a file with --file".to_string());
    }

    if args.json && args.csv {
        return Err("Cannot specify multiple output formats (--json, --csv)".to_string());
    }

    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    Ok(())
}

/// Main logic. Returns `Ok(false)` when any URL failed to parse.
async fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let env_config = load_env_config(args.verbose);
    let file_config = load_file_config(&args, &env_config)?;
    let settings = build_settings(&args, &file_config, &env_config);
    debug!(?settings, "resolved settings");

    let urls = collect_urls(&args, &env_config)?;

    let results = if settings.probes_enabled() {
        run_probes(&urls, &settings, &args).await?
    } else {
        let start_time = Instant::now();
        let results: Vec<ProbeResult> = urls
            .iter()
            .map(|url| ProbeResult::from_parse(url.as_str(), ParsedUrl::parse(url)))
            .collect();
        display_results(&results, &settings, &args, start_time.elapsed())?;
        results
    };

    Ok(results.iter().all(ProbeResult::is_valid))
}

/// Load the explicit config file (CLI, then `USPLIT_CONFIG`) or discover one.
fn load_file_config(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let manager = ConfigManager::new(args.verbose);

    if let Some(path) = args.config.as_ref().or(env_config.config.as_ref()) {
        debug!(path = %path, "using explicit config file");
        return manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e).into());
    }

    match manager.discover_and_load() {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!("Config discovery warning: {}", e);
            Ok(FileConfig::default())
        }
    }
}

/// Build settings.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (USPLIT_*)
/// 3. Config files
/// 4. Built-in defaults (parse only, text output)
fn build_settings(args: &Args, file_config: &FileConfig, env_config: &EnvConfig) -> Settings {
    let mut probe = ProbeConfig::default().with_live(false).with_dns(false);
    probe = file_config.apply_to(probe);
    probe = env_config.apply_to(probe);

    if let Some(concurrency) = args.concurrency {
        probe = probe.with_concurrency(concurrency);
    }
    if let Some(secs) = args.timeout.as_deref().and_then(parse_timeout_string) {
        probe = probe.with_timeout(Duration::from_secs(secs));
    }
    if args.live {
        probe = probe.with_live(true);
    }
    if args.dns {
        probe = probe.with_dns(true);
    }

    let mut format = file_config.output_format().unwrap_or_default();
    if env_config.has_output_format_conflict() {
        warn!("Both USPLIT_JSON and USPLIT_CSV are set, ignoring both");
    } else if env_config.json == Some(true) {
        format = OutputFormat::Json;
    } else if env_config.csv == Some(true) {
        format = OutputFormat::Csv;
    }
    if args.json {
        format = OutputFormat::Json;
    } else if args.csv {
        format = OutputFormat::Csv;
    }

    let pretty = args.pretty
        || env_config.pretty.unwrap_or(false)
        || file_config
            .output
            .as_ref()
            .and_then(|o| o.pretty)
            .unwrap_or(false);

    Settings {
        probe,
        format,
        pretty,
    }
}

/// Gather URLs from positional args and the input file.
fn collect_urls(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut urls = args.urls.clone();

    if let Some(path) = args.file.as_ref().or(env_config.file.as_ref()) {
        urls.extend(read_url_file(path)?);
    }

    if urls.is_empty() {
        return Err("No URLs to process".into());
    }

    Ok(urls)
}

/// Probe every URL. Text output streams; structured output is collected first.
async fn run_probes(
    urls: &[String],
    settings: &Settings,
    args: &Args,
) -> Result<Vec<ProbeResult>, Box<dyn std::error::Error>> {
    let prober = UrlProber::with_config(settings.probe.clone())?;
    let start_time = Instant::now();

    let streaming = settings.format == OutputFormat::Text && urls.len() > 1;
    if !streaming {
        let spinner = ui::Spinner::start(format!(
            "Probing {} URL{}...",
            urls.len(),
            if urls.len() == 1 { "" } else { "s" }
        ));

        let results = prober.probe_urls(urls).await;

        if let Some(s) = spinner {
            s.stop().await;
        }

        display_results(&results, settings, args, start_time.elapsed())?;
        return Ok(results);
    }

    if settings.pretty {
        ui::print_header(urls.len(), settings.probe.concurrency, &settings.probe_names());
    }

    let total = urls.len();
    let mut results = Vec::with_capacity(total);
    let mut stream = prober.probe_urls_stream(urls);

    while let Some(result) = stream.next().await {
        if settings.pretty {
            ui::print_result_block(&result, args.debug);
        } else {
            ui::print_result_line(&result, args.debug, Some((results.len() + 1, total)));
        }
        results.push(result);
    }

    println!();
    ui::print_summary(&results, start_time.elapsed());

    Ok(results)
}

fn display_results(
    results: &[ProbeResult],
    settings: &Settings,
    args: &Args,
    duration: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    match settings.format {
        OutputFormat::Json => display_json_results(results)?,
        OutputFormat::Csv => display_csv_results(results),
        OutputFormat::Text => display_text_results(results, settings, args, duration),
    }

    Ok(())
}

/// Display results in JSON format
fn display_json_results(results: &[ProbeResult]) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}

/// Display results in CSV format
fn display_csv_results(results: &[ProbeResult]) {
    println!("url,subdomains,domain,tld,country_tld,path,live,resolvable,error");

    for result in results {
        let (subdomains, domain, tld, country_tld, path) = match &result.parsed {
            Some(p) => (
                p.subdomains().join("."),
                p.domain().to_string(),
                p.tld().to_string(),
                p.country_tld().unwrap_or("").to_string(),
                p.path().to_string(),
            ),
            None => Default::default(),
        };

        let fields = [
            result.url.clone(),
            subdomains,
            domain,
            tld,
            country_tld,
            path,
            csv_flag(result.live),
            csv_flag(result.resolvable),
            result.error_message.clone().unwrap_or_default(),
        ];

        println!(
            "{}",
            fields
                .iter()
                .map(|f| csv_escape(f))
                .collect::<Vec<_>>()
                .join(",")
        );
    }
}

/// Display results in human-readable text format
fn display_text_results(
    results: &[ProbeResult],
    settings: &Settings,
    args: &Args,
    duration: Duration,
) {
    if settings.pretty {
        ui::print_header(results.len(), settings.probe.concurrency, &settings.probe_names());
        for result in results {
            ui::print_result_block(result, args.debug);
        }
    } else {
        for result in results {
            ui::print_result_line(result, args.debug, None);
        }
    }

    if results.len() > 1 || settings.pretty {
        println!();
        ui::print_summary(results, duration);
    }
}

fn csv_flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "true".to_string(),
        Some(false) => "false".to_string(),
        None => String::new(),
    }
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["urlsplit"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn validate(extra: &[&str]) -> Result<(), String> {
        validate_args(&args(extra), no_env)
    }

    #[test]
    fn test_validate_args_requires_input() {
        assert!(validate(&[]).is_err());
        assert!(validate(&["https://bora.fi"]).is_ok());
        assert!(validate(&["--file", "urls.txt"]).is_ok());
    }

    #[test]
    fn test_validate_args_accepts_file_from_env() {
        let with_file = |key: &str| (key == "USPLIT_FILE").then(|| "urls.txt".to_string());
        assert!(validate_args(&args(&[]), with_file).is_ok());
    }

    #[test]
    fn test_validate_args_conflicts() {
        assert!(validate(&["https://bora.fi", "--json", "--csv"]).is_err());
        assert!(validate(&["https://bora.fi", "-c", "0"]).is_err());
        assert!(validate(&["https://bora.fi", "-c", "101"]).is_err());
        assert!(validate(&["https://bora.fi", "--timeout", "soon"]).is_err());
        assert!(validate(&["https://bora.fi", "--timeout", "3s"]).is_ok());
    }

    #[test]
    fn test_build_settings_defaults_to_parse_only() {
        let settings = build_settings(
            &args(&["https://bora.fi"]),
            &FileConfig::default(),
            &EnvConfig::default(),
        );
        assert!(!settings.probes_enabled());
        assert_eq!(settings.format, OutputFormat::Text);
        assert!(!settings.pretty);
    }

    #[test]
    fn test_build_settings_cli_wins() {
        let env_config = EnvConfig {
            concurrency: Some(5),
            csv: Some(true),
            ..Default::default()
        };
        let settings = build_settings(
            &args(&["https://bora.fi", "--live", "-c", "40", "--json", "--timeout", "2s"]),
            &FileConfig::default(),
            &env_config,
        );
        assert!(settings.probe.check_live);
        assert!(!settings.probe.check_dns);
        assert_eq!(settings.probe.concurrency, 40);
        assert_eq!(settings.probe.timeout, Duration::from_secs(2));
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.probe_names(), vec!["live"]);
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_flag() {
        assert_eq!(csv_flag(Some(true)), "true");
        assert_eq!(csv_flag(Some(false)), "false");
        assert_eq!(csv_flag(None), "");
    }
}
