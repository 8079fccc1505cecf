//! Crash event records
//!
//! Value objects produced by scanning. An `Event` captures one matched
//! line plus its surrounding context; a `ScanIssue` records a file that
//! could not be scanned. Both serialize to JSON so a finished scan can
//! feed the text report or a structured consumer without re-scanning.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One detected crash signature with its surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Source file the match came from.
    pub file: PathBuf,

    /// 1-indexed line number of the matching line.
    pub line_number: u64,

    /// Label of the signature that matched (first match wins).
    pub pattern_label: String,

    /// Timestamp prefix of the matching line, if one was recognized.
    pub timestamp: Option<String>,

    /// Raw newline-stripped lines covering the context window, in file
    /// order, matching line included.
    pub context: Vec<String>,

    /// 1-indexed line number of the first context line. The matching
    /// line sits at index `line_number - context_start` within `context`.
    pub context_start: u64,
}

/// A file that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanIssue {
    /// File the scan failed on.
    pub file: PathBuf,
    /// Underlying cause, human-readable.
    pub message: String,
}
