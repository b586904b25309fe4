//! Utilities for path collection, size labels and lenient number parsing.

use crate::{Result, error::MergerError};
use std::path::PathBuf;

/// Format a byte count as kilobytes with one decimal, e.g. `"12.5 KB"`.
///
/// This is the label used for every file row and for the selection total.
/// Ties round up, so 256 bytes is `"0.3 KB"`.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", round_tenths(bytes as f64 / 1024.0))
}

/// Round to one decimal place, with ties away from zero.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format a byte count as a human-readable size with the largest fitting unit.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

/// Parse the leading integer of a label, ignoring anything after it.
///
/// Leading whitespace and a single sign are accepted, so `" 12 pages"` gives
/// `Some(12)` and `"-3"` gives `Some(-3)`. Returns `None` when no digit
/// follows. Digits beyond the `i64` range saturate.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}

/// Parse the leading decimal number of a label, ignoring anything after it.
///
/// `"34.5 KB"` gives `Some(34.5)`, `"1e3x"` gives `Some(1000.0)`, `"KB"`
/// gives `None`.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let candidate_len = text
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    // Longest prefix that still parses wins, e.g. "1.5e" -> "1.5".
    (1..=candidate_len)
        .rev()
        .find_map(|len| text[..len].parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let paths = collect_paths_for_pattern(pattern)?;
        resolved_paths.extend(paths);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern.as_ref())
        .map_err(|err| MergerError::invalid_config(format!("Invalid glob pattern: {err}")))?;

    paths
        .map(|entry| entry.map_err(|err| MergerError::other(err.to_string())))
        .collect()
}

/// Whether a string contains glob metacharacters.
pub fn is_glob_pattern(text: &str) -> bool {
    text.contains(['*', '?', '['])
}
