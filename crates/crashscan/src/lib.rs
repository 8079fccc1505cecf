//! CLI support for the crashscan binary: candidate file discovery and
//! pattern file loading. The scan engine itself lives in
//! `crashscan_core`.

pub mod discovery;
pub mod pattern_file;
