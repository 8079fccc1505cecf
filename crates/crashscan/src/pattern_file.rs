//! Pattern file loading
//!
//! Optional TOML file with extra crash signatures, appended after the
//! built-ins and sharing their case-insensitive, first-match-wins
//! semantics:
//!
//! ```toml
//! [[patterns]]
//! label = "java heap"
//! regex = 'java\.lang\.OutOfMemoryError'
//!
//! [[patterns]]
//! regex = "watchdog: BUG: soft lockup"
//! ```
//!
//! The `label` is what the report quotes; it defaults to the regex
//! source, so labeling is purely a configuration-time tagging hook.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crashscan_core::PatternSpec;

#[derive(Debug, Deserialize)]
struct PatternFile {
    #[serde(default)]
    patterns: Vec<PatternEntry>,
}

#[derive(Debug, Deserialize)]
struct PatternEntry {
    #[serde(default)]
    label: Option<String>,
    regex: String,
}

/// Load pattern specs from a TOML file.
pub fn load(path: &Path) -> Result<Vec<PatternSpec>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read pattern file {}", path.display()))?;
    let parsed: PatternFile =
        toml::from_str(&text).with_context(|| format!("parse pattern file {}", path.display()))?;

    Ok(parsed
        .patterns
        .into_iter()
        .map(|e| PatternSpec {
            label: e.label,
            regex: e.regex,
        })
        .collect())
}
