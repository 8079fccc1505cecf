//! Batch scan orchestration
//!
//! Drives the scan over a set of files, sequentially or across a bounded
//! worker pool. Per-file scans share no state; the single merge point is
//! the collector, which reorders completed files by submission index
//! before aggregating, so a given input list produces the same result on
//! every run regardless of worker scheduling.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::aggregate::{Aggregator, ScanResult};
use crate::events::Event;
use crate::patterns::PatternSet;
use crate::scanner::{scan_file, ScanError};

/// Parameters for one batch scan.
#[derive(Debug, Clone)]
pub struct ScanJob {
    /// Context lines captured on each side of a match.
    pub radius: usize,
    /// Worker threads; `None` selects the machine's parallelism,
    /// `Some(1)` forces the sequential path.
    pub threads: Option<usize>,
}

impl Default for ScanJob {
    fn default() -> Self {
        Self {
            radius: 5,
            threads: None,
        }
    }
}

impl ScanJob {
    pub fn new(radius: usize) -> Self {
        Self {
            radius,
            threads: None,
        }
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Scan every file and aggregate the outcome.
    ///
    /// Unreadable files become `errors` entries; a per-file failure never
    /// aborts the batch.
    pub fn run(&self, paths: &[PathBuf], patterns: &PatternSet) -> ScanResult {
        let threads = self.threads.unwrap_or_else(num_cpus::get).max(1);
        let result = if threads > 1 && paths.len() > 1 {
            self.run_parallel(paths, patterns, threads)
        } else {
            self.run_sequential(paths, patterns)
        };

        info!(
            files = paths.len(),
            events = result.event_count(),
            errors = result.errors.len(),
            "scan complete"
        );
        result
    }

    fn run_sequential(&self, paths: &[PathBuf], patterns: &PatternSet) -> ScanResult {
        let mut agg = Aggregator::new();
        for path in paths {
            let outcome = scan_file(path, patterns, self.radius);
            if let Err(err) = &outcome {
                warn!(file = %path.display(), error = %err.source, "file skipped");
            }
            agg.add_outcome(outcome);
        }
        agg.finish()
    }

    /// Parallel path: a bounded rayon pool fans out per-file scans, a
    /// channel feeds the single collector thread, and a BTreeMap
    /// re-establishes submission order before the merge.
    fn run_parallel(
        &self,
        paths: &[PathBuf],
        patterns: &PatternSet,
        threads: usize,
    ) -> ScanResult {
        use rayon::prelude::*;

        type Outcome = Result<Vec<Event>, ScanError>;
        let (tx, rx) = crossbeam_channel::bounded::<(usize, Outcome)>(256);

        let radius = self.radius;
        let patterns = patterns.clone();
        let indexed: Vec<(usize, PathBuf)> = paths.iter().cloned().enumerate().collect();

        let scan_thread = std::thread::spawn(move || {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .expect("build worker pool");
            pool.install(|| {
                indexed.par_iter().for_each(|(idx, path)| {
                    let outcome = scan_file(path, &patterns, radius);
                    let _ = tx.send((*idx, outcome));
                });
            });
            // All senders drop here, which closes the channel.
        });

        let mut agg = Aggregator::new();
        let mut next_idx = 0usize;
        let mut pending: BTreeMap<usize, Outcome> = BTreeMap::new();

        while let Ok((idx, outcome)) = rx.recv() {
            pending.insert(idx, outcome);
            while let Some(outcome) = pending.remove(&next_idx) {
                if let Err(err) = &outcome {
                    warn!(file = %err.file.display(), error = %err.source, "file skipped");
                }
                agg.add_outcome(outcome);
                next_idx += 1;
            }
        }

        let _ = scan_thread.join();

        // The channel closed with the pool drained; flush any stragglers.
        while let Some(outcome) = pending.remove(&next_idx) {
            agg.add_outcome(outcome);
            next_idx += 1;
        }

        agg.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn corpus(dir: &tempfile::TempDir) -> Vec<PathBuf> {
        let a = dir.path().join("a.log");
        fs::write(
            &a,
            "boot ok\n2024-01-01 10:00:00 kernel panic - not syncing\nreboot\n",
        )
        .unwrap();

        let b = dir.path().join("b.log");
        fs::write(&b, "all quiet\nstill quiet\n").unwrap();

        let c = dir.path().join("c.log");
        fs::write(&c, "worker Segmentation fault\nworker dumped core\n").unwrap();

        vec![a, b, c]
    }

    #[test]
    fn test_missing_file_recorded_others_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = corpus(&dir);
        paths.insert(1, dir.path().join("missing.log"));

        let patterns = PatternSet::with_defaults();
        let result = ScanJob::new(1).run(&paths, &patterns);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].file, dir.path().join("missing.log"));
        // a.log has one event, c.log has two.
        assert_eq!(result.event_count(), 3);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let dir = tempfile::tempdir().unwrap();
        let paths = corpus(&dir);
        let patterns = PatternSet::with_defaults();

        let sequential = ScanJob::new(2)
            .with_threads(Some(1))
            .run(&paths, &patterns);
        let parallel = ScanJob::new(2)
            .with_threads(Some(4))
            .run(&paths, &patterns);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let paths = corpus(&dir);
        let patterns = PatternSet::with_defaults();
        let job = ScanJob::new(2).with_threads(Some(4));

        assert_eq!(job.run(&paths, &patterns), job.run(&paths, &patterns));
    }

    #[test]
    fn test_file_internal_order_by_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let paths = corpus(&dir);
        let patterns = PatternSet::with_defaults();

        let result = ScanJob::new(0).run(&paths, &patterns);
        let c_lines: Vec<u64> = result
            .events
            .iter()
            .filter(|e| e.file.ends_with("c.log"))
            .map(|e| e.line_number)
            .collect();
        assert_eq!(c_lines, vec![1, 2]);
    }

    #[test]
    fn test_counts_aggregate_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = corpus(&dir);
        let patterns = PatternSet::with_defaults();

        let result = ScanJob::new(1).run(&paths, &patterns);

        assert_eq!(result.per_pattern_counts.get("kernel panic"), Some(&1));
        assert_eq!(result.per_pattern_counts.get("Segmentation fault"), Some(&1));
        assert_eq!(result.per_pattern_counts.get("dumped core"), Some(&1));
    }

    #[test]
    fn test_empty_path_list_yields_empty_result() {
        let patterns = PatternSet::with_defaults();
        let result = ScanJob::default().run(&[], &patterns);

        assert_eq!(result.event_count(), 0);
        assert!(result.errors.is_empty());
        assert!(result.per_pattern_counts.is_empty());
    }
}
