//! Candidate log file discovery
//!
//! A single file is scanned as-is; a directory is walked recursively,
//! keeping the usual suspects: `*.log`, `*.txt`, `*.out`, `*.err` plus
//! syslog/messages style names. Results are sorted so a given tree
//! always scans in the same order.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File extensions accepted during a directory walk.
const LOG_EXTENSIONS: &[&str] = &["log", "txt", "out", "err"];

/// Collect the files to scan under `path`.
pub fn collect_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| is_log_candidate(p))
        .collect();

    files.sort();
    files
}

/// Whether a file name looks like a log file.
fn is_log_candidate(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n.to_ascii_lowercase(),
        None => return false,
    };

    // Rotated system logs (syslog.1, messages-20240101) carry no
    // extension worth filtering on.
    if name.contains("syslog") || name.contains("messages") {
        return true;
    }

    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| LOG_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
