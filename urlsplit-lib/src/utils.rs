//! Helpers for reading URL lists.

use crate::error::UrlSplitError;
use std::fs;
use std::path::Path;

/// Extract URLs from text with one URL per line.
///
/// Empty lines and lines starting with `#` are skipped; a `#` preceded by
/// whitespace starts an inline comment. A bare `#` inside a URL is kept,
/// since it marks a fragment.
pub fn read_url_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.find(" #").or_else(|| line.find("\t#")) {
            Some(idx) => line[..idx].trim_end(),
            None => line,
        })
        .map(str::to_string)
        .collect()
}

/// Read a URL list file.
///
/// # Errors
///
/// Returns `UrlSplitError::FileError` if the file cannot be read or holds no URLs.
pub fn read_url_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, UrlSplitError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        UrlSplitError::file_error(path.to_string_lossy(), format!("Failed to read file: {}", e))
    })?;

    let urls = read_url_lines(&content);
    if urls.is_empty() {
        return Err(UrlSplitError::file_error(
            path.to_string_lossy(),
            "No URLs found in file",
        ));
    }

    Ok(urls)
}
