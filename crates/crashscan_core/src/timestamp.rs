//! Timestamp extraction
//!
//! Best-effort recognition of a timestamp at the very start of a log
//! line. Two prefix formats are tried in order:
//! - syslog style: `Feb 10 09:00:00`
//! - ISO style: `2026-02-10T09:00:00` or `2026-02-10 09:00:00`
//!
//! The matched prefix is returned verbatim, with no year or timezone
//! normalization. A missing timestamp is not an error.

use once_cell::sync::Lazy;
use regex::Regex;

static PREFIX_FORMATS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\w{3}\s+\d+\s+\d{2}:\d{2}:\d{2}").unwrap(),
        Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}").unwrap(),
    ]
});

/// Extract a recognized timestamp prefix from a log line.
///
/// Only the start of the line is considered; a timestamp appearing
/// mid-line is ignored.
pub fn extract(line: &str) -> Option<&str> {
    PREFIX_FORMATS
        .iter()
        .find_map(|re| re.find(line))
        .map(|m| m.as_str())
}
