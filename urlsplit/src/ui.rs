//! Terminal display logic for the urlsplit CLI.
//!
//! Handles text output: one-line results, `--pretty` blocks, the batch
//! spinner, headers and summaries. Structured formats live in `main.rs`.

use console::{pad_str, style, Alignment, Term};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use urlsplit_lib::{ParsedUrl, ProbeResult};

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner with the given message. Returns `None` if stderr isn't a TTY.
    pub fn start(message: String) -> Option<Self> {
        if !Term::stderr().is_term() {
            return None;
        }

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Some(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a pretty run.
pub fn print_header(url_count: usize, concurrency: usize, probes: &[&str]) {
    println!(
        "{} {} {}",
        style("urlsplit").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "· {} URL{}",
            url_count,
            if url_count == 1 { "" } else { "s" }
        ))
        .dim(),
    );

    let mut meta_parts: Vec<String> = Vec::new();
    if probes.is_empty() {
        meta_parts.push("Parse only".to_string());
    } else {
        meta_parts.push(format!("Probes: {}", probes.join(", ")));
        meta_parts.push(format!("Concurrency: {}", concurrency));
    }

    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Single result ────────────────────────────────────────────────────────────

/// Print one result as a single colored line.
///
/// If `counter` is Some((current, total)), a progress prefix like `[3/8]` is shown.
pub fn print_result_line(result: &ProbeResult, debug: bool, counter: Option<(usize, usize)>) {
    let prefix = match counter {
        Some((cur, total)) => format!("{} ", style(format!("[{}/{}]", cur, total)).dim()),
        None => String::new(),
    };

    match &result.parsed {
        Some(parsed) => {
            let host = pad_str(parsed.full_domain(), 36, Alignment::Left, Some(".."));
            println!(
                "{}{}  {}{}",
                prefix,
                style(host).white(),
                format_parts(parsed),
                format_probes(result),
            );
        }
        None => {
            let url = pad_str(&result.url, 36, Alignment::Left, Some(".."));
            println!(
                "{}{}  {}  {}",
                prefix,
                style(url).white(),
                style("INVALID").red().bold(),
                style(result.error_message.as_deref().unwrap_or("")).dim(),
            );
        }
    }

    if debug {
        print_timing(result, "  ");
    }
}

/// Print one result as a labelled block (`--pretty`).
pub fn print_result_block(result: &ProbeResult, debug: bool) {
    let Some(parsed) = &result.parsed else {
        println!(
            "  {} {}",
            style("✗").red().bold(),
            style(&result.url).white().bold()
        );
        println!(
            "    {}",
            style(result.error_message.as_deref().unwrap_or("invalid URL")).red()
        );
        println!();
        return;
    };

    println!(
        "  {} {}",
        style("✓").green().bold(),
        style(&result.url).white().bold()
    );

    let subdomains = if parsed.subdomains().is_empty() {
        "-".to_string()
    } else {
        parsed.subdomains().join(".")
    };

    let rows = [
        ("Subdomains", subdomains),
        ("Domain", parsed.domain().to_string()),
        ("TLD", parsed.tld().to_string()),
        ("Country TLD", parsed.country_tld().unwrap_or("-").to_string()),
        ("Full domain", parsed.full_domain().to_string()),
        ("Path", non_empty(parsed.path())),
        ("Queries", format_queries(parsed)),
    ];
    for (label, value) in rows {
        println!(
            "    {}  {}",
            style(pad_str(label, 12, Alignment::Left, None)).dim(),
            value
        );
    }

    if let Some(live) = result.live {
        println!(
            "    {}  {}",
            style(pad_str("Live", 12, Alignment::Left, None)).dim(),
            yes_no(live)
        );
    }
    if let Some(resolvable) = result.resolvable {
        println!(
            "    {}  {}",
            style(pad_str("DNS", 12, Alignment::Left, None)).dim(),
            yes_no(resolvable)
        );
    }

    if debug {
        print_timing(result, "    ");
    }
    println!();
}

fn print_timing(result: &ProbeResult, indent: &str) {
    if let Some(duration) = result.probe_duration {
        println!(
            "{}{} Probed in {}ms",
            indent,
            style("└─").dim(),
            duration.as_millis()
        );
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(results: &[ProbeResult], duration: Duration) {
    let total = results.len();
    let valid = results.iter().filter(|r| r.is_valid()).count();
    let invalid = total - valid;

    let mut parts = vec![
        style(format!("{} parsed", valid)).green().to_string(),
        style(format!("{} invalid", invalid)).red().to_string(),
    ];

    if results.iter().any(|r| r.live.is_some()) {
        let live = results.iter().filter(|r| r.live == Some(true)).count();
        parts.push(style(format!("{} live", live)).cyan().to_string());
    }
    if results.iter().any(|r| r.resolvable.is_some()) {
        let resolvable = results.iter().filter(|r| r.resolvable == Some(true)).count();
        parts.push(style(format!("{} resolvable", resolvable)).cyan().to_string());
    }

    println!(
        "{}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "{} URL{} in {:.1}s  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        parts.join(&format!("  {}  ", style("|").dim())),
    );
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Compact `sub | domain | suffix` rendering used on one-line output.
pub fn format_parts(parsed: &ParsedUrl) -> String {
    let subdomains = if parsed.subdomains().is_empty() {
        "-".to_string()
    } else {
        parsed.subdomains().join(".")
    };
    format!(
        "{} {} {} {} {}",
        subdomains,
        style("|").dim(),
        style(parsed.domain()).bold(),
        style("|").dim(),
        style(parsed.public_suffix()).cyan(),
    )
}

/// Probe answers, empty when no probe ran.
fn format_probes(result: &ProbeResult) -> String {
    let mut out = String::new();
    if let Some(live) = result.live {
        let label = if live {
            style("LIVE").green().bold()
        } else {
            style("DOWN").red().bold()
        };
        out.push_str(&format!("  {}", label));
    }
    if let Some(resolvable) = result.resolvable {
        let label = if resolvable {
            style("DNS").green()
        } else {
            style("NO DNS").yellow()
        };
        out.push_str(&format!("  {}", label));
    }
    out
}

/// Render query parameters as `key=[v1, v2]` pairs.
pub fn format_queries(parsed: &ParsedUrl) -> String {
    if parsed.queries().is_empty() {
        return "-".to_string();
    }
    parsed
        .queries()
        .iter()
        .map(|(key, values)| format!("{}=[{}]", key, values.join(", ")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn yes_no(value: bool) -> String {
    if value {
        style("yes").green().to_string()
    } else {
        style("no").red().to_string()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_queries() {
        let parsed = ParsedUrl::parse("https://example.com/?q=a+b&q=c&z=1").unwrap();
        assert_eq!(format_queries(&parsed), "q=[a b, c] z=[1]");
    }

    #[test]
    fn test_format_queries_empty() {
        let parsed = ParsedUrl::parse("https://example.com").unwrap();
        assert_eq!(format_queries(&parsed), "-");
    }

    #[test]
    fn test_format_parts_mentions_suffix() {
        console::set_colors_enabled(false);
        let parsed = ParsedUrl::parse("https://blog.boratanrikulu.com.tr").unwrap();
        assert_eq!(format_parts(&parsed), "blog | boratanrikulu | com.tr");
    }

    #[test]
    fn test_format_probes_empty_without_probes() {
        let result = ProbeResult::from_parse("https://bora.fi", ParsedUrl::parse("https://bora.fi"));
        assert_eq!(format_probes(&result), "");
    }
}
