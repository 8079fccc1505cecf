//! Scan aggregation
//!
//! Collects per-file scan outcomes into a single `ScanResult`: the flat
//! event list, per-signature counts and per-file errors. All counting
//! happens here, once per emitted event, so no other component holds
//! running totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::{Event, ScanIssue};
use crate::scanner::ScanError;

/// Aggregated outcome of scanning one or more files.
///
/// Read-only once built; serializes to JSON for structured consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// All events; within one file's contribution the order is strictly
    /// ascending by line number.
    pub events: Vec<Event>,

    /// Events per signature label.
    pub per_pattern_counts: BTreeMap<String, u64>,

    /// Files that could not be scanned.
    pub errors: Vec<ScanIssue>,
}

/// Compact summary for structured consumers: the counts without the
/// context bodies.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub event_count: usize,
    pub per_pattern_counts: BTreeMap<String, u64>,
    pub errors: Vec<ScanIssue>,
}

impl ScanResult {
    /// Total number of detected events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Counts-only view of this result.
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            event_count: self.events.len(),
            per_pattern_counts: self.per_pattern_counts.clone(),
            errors: self.errors.clone(),
        }
    }

    /// Summary as a JSON string.
    pub fn summary_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary())
    }
}

/// Incremental collector for per-file scan outcomes.
#[derive(Debug, Default)]
pub struct Aggregator {
    result: ScanResult,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one file's outcome.
    pub fn add_outcome(&mut self, outcome: Result<Vec<Event>, ScanError>) {
        match outcome {
            Ok(events) => self.add_events(events),
            Err(err) => self.add_error(err),
        }
    }

    /// Append a file's events, counting each exactly once.
    pub fn add_events(&mut self, events: Vec<Event>) {
        for event in &events {
            *self
                .result
                .per_pattern_counts
                .entry(event.pattern_label.clone())
                .or_insert(0) += 1;
        }
        self.result.events.extend(events);
    }

    /// Record a file that could not be scanned.
    pub fn add_error(&mut self, error: ScanError) {
        self.result.errors.push(ScanIssue {
            file: error.file,
            message: error.source.to_string(),
        });
    }

    /// Finish aggregation; the result is read-only from here on.
    pub fn finish(self) -> ScanResult {
        self.result
    }
}
