//! Report rendering
//!
//! Turns a finished `ScanResult` into the final crash report text.
//! Rendering is a pure function over the result plus a `ReportMeta`
//! header block: the same result can feed this renderer and the JSON
//! summary without re-scanning, and a fixed meta yields byte-identical
//! output on every call.

use chrono::{DateTime, Local};

use crate::aggregate::ScanResult;

/// Placeholder printed when a matching line carried no recognizable
/// timestamp.
const UNKNOWN_TIMESTAMP: &str = "Unknown";

/// Header metadata for a rendered report.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// When the report was generated.
    pub generated_at: DateTime<Local>,
    /// System hostname.
    pub hostname: String,
    /// OS release string.
    pub os_release: String,
}

impl ReportMeta {
    /// Collect host identity from the running system.
    pub fn collect() -> Self {
        Self {
            generated_at: Local::now(),
            hostname: read_hostname(),
            os_release: read_os_release(),
        }
    }
}

fn read_hostname() -> String {
    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .or_else(|| {
            std::process::Command::new("hostname")
                .output()
                .ok()
                .and_then(|out| String::from_utf8(out.stdout).ok())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "localhost".to_string())
}

fn read_os_release() -> String {
    std::fs::read_to_string("/etc/os-release")
        .ok()
        .and_then(|content| {
            content
                .lines()
                .find(|line| line.starts_with("PRETTY_NAME="))
                .map(|line| {
                    line.trim_start_matches("PRETTY_NAME=")
                        .trim_matches('"')
                        .to_string()
                })
        })
        .unwrap_or_else(|| "Unknown OS".to_string())
}

/// Render the full text report.
///
/// Layout: banner header with generation time, host identity and event
/// total; per-file scan issues as informational entries; then one
/// numbered block per event with its context snippet. Context lines get
/// a uniform two-space prefix.
pub fn render_text(result: &ScanResult, meta: &ReportMeta) -> String {
    let banner = "=".repeat(60);
    let rule = ".".repeat(40);
    let mut out = String::new();

    out.push_str(&format!("{}\n", banner));
    out.push_str("SYSTEM CRASH REPORT\n");
    out.push_str(&format!(
        "Generated: {}\n",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Host: {} ({})\n", meta.hostname, meta.os_release));
    out.push_str(&format!("Events Found: {}\n", result.event_count()));
    out.push_str(&format!("{}\n\n", banner));

    if !result.errors.is_empty() {
        out.push_str(&format!("Scan Errors ({}):\n", result.errors.len()));
        for issue in &result.errors {
            out.push_str(&format!("  [!] {}: {}\n", issue.file.display(), issue.message));
        }
        out.push('\n');
    }

    if result.events.is_empty() {
        out.push_str("No crash events detected in scanned logs.\n");
        return out;
    }

    for (i, event) in result.events.iter().enumerate() {
        out.push_str(&format!("EVENT #{}\n", i + 1));
        out.push_str(&format!("{}\n", "-".repeat(20)));
        out.push_str(&format!("File: {}\n", event.file.display()));
        out.push_str(&format!("Line: {}\n", event.line_number));
        out.push_str(&format!("Pattern Matched: '{}'\n", event.pattern_label));
        out.push_str(&format!(
            "Timestamp: {}\n\n",
            event.timestamp.as_deref().unwrap_or(UNKNOWN_TIMESTAMP)
        ));
        out.push_str("Context Snippet:\n");
        out.push_str(&format!("{}\n", rule));
        for line in &event.context {
            out.push_str(&format!("  {}\n", line));
        }
        out.push_str(&format!("{}\n\n", rule));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::events::Event;
    use crate::scanner::ScanError;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn fixed_meta() -> ReportMeta {
        ReportMeta {
            generated_at: Local.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap(),
            hostname: "testhost".to_string(),
            os_release: "Arch Linux".to_string(),
        }
    }

    fn sample_event() -> Event {
        Event {
            file: PathBuf::from("/var/log/app.log"),
            line_number: 5,
            pattern_label: "kernel panic".to_string(),
            timestamp: Some("2024-01-01 10:00:00".to_string()),
            context: vec![
                "line 3".to_string(),
                "line 4".to_string(),
                "2024-01-01 10:00:00 kernel panic - not syncing".to_string(),
                "line 6".to_string(),
                "line 7".to_string(),
            ],
            context_start: 3,
        }
    }

    #[test]
    fn test_header_block() {
        let result = ScanResult::default();
        let report = render_text(&result, &fixed_meta());

        assert!(report.starts_with(&"=".repeat(60)));
        assert!(report.contains("SYSTEM CRASH REPORT"));
        assert!(report.contains("Generated: 2026-02-10 09:00:00"));
        assert!(report.contains("Host: testhost (Arch Linux)"));
        assert!(report.contains("Events Found: 0"));
    }

    #[test]
    fn test_zero_events_single_line() {
        let result = ScanResult::default();
        let report = render_text(&result, &fixed_meta());

        assert!(report.contains("No crash events detected in scanned logs."));
        assert!(!report.contains("EVENT #"));
    }

    #[test]
    fn test_event_block_fields() {
        let mut agg = Aggregator::new();
        agg.add_events(vec![sample_event()]);
        let result = agg.finish();

        let report = render_text(&result, &fixed_meta());

        assert!(report.contains("EVENT #1"));
        assert!(report.contains("File: /var/log/app.log"));
        assert!(report.contains("Line: 5"));
        assert!(report.contains("Pattern Matched: 'kernel panic'"));
        assert!(report.contains("Timestamp: 2024-01-01 10:00:00"));
        assert!(report.contains("Context Snippet:"));
        assert!(report.contains("  line 3"));
        assert!(report.contains("  line 7"));
    }

    #[test]
    fn test_missing_timestamp_placeholder() {
        let mut event = sample_event();
        event.timestamp = None;

        let mut agg = Aggregator::new();
        agg.add_events(vec![event]);
        let report = render_text(&agg.finish(), &fixed_meta());

        assert!(report.contains("Timestamp: Unknown"));
    }

    #[test]
    fn test_scan_errors_listed_as_informational() {
        let mut agg = Aggregator::new();
        agg.add_error(ScanError {
            file: PathBuf::from("/var/log/locked.log"),
            source: std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            ),
        });
        let report = render_text(&agg.finish(), &fixed_meta());

        assert!(report.contains("Scan Errors (1):"));
        assert!(report.contains("[!] /var/log/locked.log: permission denied"));
        // Still reports the zero-event line after the issue list.
        assert!(report.contains("No crash events detected in scanned logs."));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let mut agg = Aggregator::new();
        agg.add_events(vec![sample_event()]);
        let result = agg.finish();
        let meta = fixed_meta();

        assert_eq!(render_text(&result, &meta), render_text(&result, &meta));
    }
}
