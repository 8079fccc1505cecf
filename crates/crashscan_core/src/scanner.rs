//! Single-file crash scan
//!
//! Reads one log file fully into memory, tests every line against the
//! pattern set and emits an `Event` per matching line with a clipped
//! context window. Undecodable bytes are replaced and never abort the
//! scan; an unreadable file is returned as a `ScanError` value so the
//! batch can carry on.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::events::Event;
use crate::patterns::PatternSet;
use crate::timestamp;

/// Failure to open or read a file under scan.
#[derive(Debug, Error)]
#[error("cannot read {}: {source}", .file.display())]
pub struct ScanError {
    /// File the scan failed on.
    pub file: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Scan one file for crash signatures.
///
/// `radius` is the number of context lines captured on each side of a
/// match; the window is clipped to the file bounds and always contains
/// the matching line. Successive matches may produce overlapping
/// windows; each match stands on its own. The timestamp is extracted
/// from the matching line only.
pub fn scan_file(
    path: &Path,
    patterns: &PatternSet,
    radius: usize,
) -> Result<Vec<Event>, ScanError> {
    let bytes = fs::read(path).map_err(|source| ScanError {
        file: path.to_path_buf(),
        source,
    })?;

    // Replacement-character decoding: a corrupt byte never loses the file.
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();

    let mut events = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let pattern = match patterns.match_line(line) {
            Some(p) => p,
            None => continue,
        };

        let start = i.saturating_sub(radius);
        let end = (i + radius + 1).min(lines.len());
        let context: Vec<String> = lines[start..end].iter().map(|l| l.to_string()).collect();

        events.push(Event {
            file: path.to_path_buf(),
            line_number: (i + 1) as u64,
            pattern_label: pattern.label.clone(),
            timestamp: timestamp::extract(line).map(str::to_string),
            context,
            context_start: (start + 1) as u64,
        });
    }

    debug!(file = %path.display(), events = events.len(), "file scanned");
    Ok(events)
}
